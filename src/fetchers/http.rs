use crate::config::HttpConfig;
use crate::error::FetchError;
use crate::fetchers::PageFetcher;
use crate::results::Page;
use async_trait::async_trait;
use reqwest::Client;

/// Fetches pages with a single plain GET request
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(FetchError::ClientBuild)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let http_error = |source: reqwest::Error| FetchError::Http {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        // Decodes using the Content-Type charset, falling back to UTF-8
        let body = response.text().await.map_err(http_error)?;
        ::log::debug!("GET {} returned {} bytes", url, body.len());

        Ok(Page::new(url, body))
    }
}
