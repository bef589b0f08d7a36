pub mod config;
pub mod coordinator;
pub mod error;
pub mod fetchers;
pub mod parsers;
pub mod pipeline;
pub mod results;
pub mod summarizer;
pub mod target;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::Config;
pub use coordinator::{Concurrency, run_all};
pub use error::{ConfigError, Error, FetchError, SummarizeError};
pub use pipeline::Pipeline;
pub use results::{ExtractedContent, Page, Summary, SummaryResult};
pub use target::{ScrapeMethod, Target};

use fetchers::{BrowserFetcher, HttpFetcher};
use std::sync::Arc;
use summarizer::OpenAiSummarizer;

/// Main builder for summarizing a batch of URLs
pub struct Summaries {
    urls: Vec<String>,
    config: Config,
}

impl Summaries {
    /// Create a new builder for the given URLs with default configuration
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
            config: Config::default(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file, keeping any API key already set
    pub fn with_config_file(self, path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let mut config = Config::from_file(path)?;
        config.summarizer.api_key = self.config.summarizer.api_key.clone();
        Ok(self.with_config(config))
    }

    pub fn with_scrape_method(mut self, method: ScrapeMethod) -> Self {
        self.config.scrape_method = method;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config.summarizer.model = model.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.summarizer.api_key = api_key.into();
        self
    }

    /// Set the maximum number of pipelines in flight (1 runs them sequentially)
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.config.max_concurrency = Some(max_concurrency);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Normalize and validate every URL into a target
    pub fn targets(&self) -> Result<Vec<Target>, ConfigError> {
        self.urls
            .iter()
            .map(|url| {
                Target::new(
                    url.as_str(),
                    self.config.scrape_method,
                    self.config.summarizer.model.as_str(),
                )
            })
            .collect()
    }

    /// Build the default pipeline: reqwest, headless Chrome and the OpenAI API
    pub fn pipeline(&self) -> Result<Pipeline, Error> {
        let http = HttpFetcher::new(&self.config.http)?;
        let browser = BrowserFetcher::new(self.config.webdriver.clone());
        let summarizer = OpenAiSummarizer::new(&self.config.summarizer)?;

        Ok(Pipeline::new(
            Arc::new(http),
            Arc::new(browser),
            Arc::new(summarizer),
        ))
    }

    /// Summarize every URL with the default pipeline
    ///
    /// Configuration problems fail the whole batch up front; per-URL failures
    /// are reported inside the returned results.
    pub async fn generate(self) -> Result<Vec<SummaryResult>, Error> {
        let pipeline = self.pipeline()?;
        self.generate_with(pipeline).await
    }

    /// Summarize every URL with a caller-supplied pipeline
    pub async fn generate_with(self, pipeline: Pipeline) -> Result<Vec<SummaryResult>, Error> {
        let targets = self.targets()?;
        let concurrency = Concurrency::from_limit(self.config.max_concurrency);

        ::log::info!(
            "Summarizing {} URLs using {}",
            targets.len(),
            self.config.scrape_method
        );

        Ok(run_all(Arc::new(pipeline), targets, concurrency).await)
    }
}
