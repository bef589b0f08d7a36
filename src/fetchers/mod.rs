pub mod browser;
pub mod http;

pub use browser::BrowserFetcher;
pub use http::HttpFetcher;

use crate::error::FetchError;
use crate::results::Page;
use async_trait::async_trait;

/// A strategy for retrieving the raw markup of one URL
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` once; errors are returned as-is and never retried
    async fn fetch(&self, url: &str) -> Result<Page, FetchError>;
}
