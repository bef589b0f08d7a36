use crate::error::Result;
use crate::fetchers::PageFetcher;
use crate::parsers;
use crate::results::Summary;
use crate::summarizer::Summarize;
use crate::target::{ScrapeMethod, Target};
use std::sync::Arc;

/// Fetch, extract and summarize for a single target
///
/// Holds no per-run state, so one instance is shared by every concurrent run.
#[derive(Clone)]
pub struct Pipeline {
    http: Arc<dyn PageFetcher>,
    browser: Arc<dyn PageFetcher>,
    summarizer: Arc<dyn Summarize>,
}

impl Pipeline {
    pub fn new(
        http: Arc<dyn PageFetcher>,
        browser: Arc<dyn PageFetcher>,
        summarizer: Arc<dyn Summarize>,
    ) -> Self {
        Self {
            http,
            browser,
            summarizer,
        }
    }

    fn fetcher(&self, method: ScrapeMethod) -> &dyn PageFetcher {
        match method {
            ScrapeMethod::Http => self.http.as_ref(),
            ScrapeMethod::Browser => self.browser.as_ref(),
        }
    }

    /// Runs all three stages, stopping at the first error
    pub async fn run(&self, target: &Target) -> Result<Summary> {
        let url = target.url();

        ::log::info!("Starting to scrape {} using {}", url, target.method());
        let page = self.fetcher(target.method()).fetch(url).await?;
        ::log::info!("Finished scraping {} using {}", url, target.method());

        let content = parsers::extract(&page);

        ::log::info!("Starting to summarize {}", url);
        let markdown = self.summarizer.summarize(&content, target.model()).await?;
        ::log::info!("Finished summarizing {}", url);

        Ok(Summary {
            title: content.title,
            markdown,
        })
    }
}
