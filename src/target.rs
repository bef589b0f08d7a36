use crate::error::ConfigError;
use crate::utils::ensure_http_scheme;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// How a page is retrieved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeMethod {
    /// Single GET request; sees only server-rendered markup
    #[default]
    #[serde(alias = "requests")]
    Http,
    /// Headless Chrome driven over WebDriver; sees client-rendered markup
    #[serde(alias = "selenium")]
    Browser,
}

impl fmt::Display for ScrapeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeMethod::Http => f.write_str("http"),
            ScrapeMethod::Browser => f.write_str("browser"),
        }
    }
}

impl FromStr for ScrapeMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" | "requests" => Ok(ScrapeMethod::Http),
            "browser" | "selenium" => Ok(ScrapeMethod::Browser),
            other => Err(ConfigError::InvalidScrapeMethod(other.to_string())),
        }
    }
}

/// One URL to summarize, with the fetch method and model chosen for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    input: String,
    url: String,
    method: ScrapeMethod,
    model: String,
}

impl Target {
    /// Normalizes the scheme and validates that the result is an absolute URL
    pub fn new(
        input: impl Into<String>,
        method: ScrapeMethod,
        model: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let input = input.into();
        let url = ensure_http_scheme(input.trim());

        if let Err(source) = Url::parse(&url) {
            return Err(ConfigError::InvalidUrl { url, source });
        }

        Ok(Self {
            input,
            url,
            method,
            model: model.into(),
        })
    }

    /// The URL as the user supplied it
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The normalized absolute URL
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> ScrapeMethod {
        self.method
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_normalizes_scheme() {
        let target = Target::new("example.com", ScrapeMethod::Http, "gpt-4o-mini").unwrap();
        assert_eq!(target.input(), "example.com");
        assert_eq!(target.url(), "http://example.com");
        assert_eq!(target.method(), ScrapeMethod::Http);
        assert_eq!(target.model(), "gpt-4o-mini");

        let target = Target::new("https://example.com/news", ScrapeMethod::Browser, "m").unwrap();
        assert_eq!(target.url(), "https://example.com/news");
    }

    #[test]
    fn test_target_rejects_malformed_url() {
        let err = Target::new("http://exa mple.com", ScrapeMethod::Http, "m").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));

        let err = Target::new("", ScrapeMethod::Http, "m").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn test_scrape_method_from_str() {
        assert_eq!("http".parse::<ScrapeMethod>().unwrap(), ScrapeMethod::Http);
        assert_eq!("requests".parse::<ScrapeMethod>().unwrap(), ScrapeMethod::Http);
        assert_eq!("browser".parse::<ScrapeMethod>().unwrap(), ScrapeMethod::Browser);
        assert_eq!("selenium".parse::<ScrapeMethod>().unwrap(), ScrapeMethod::Browser);
        assert!(matches!(
            "curl".parse::<ScrapeMethod>(),
            Err(ConfigError::InvalidScrapeMethod(m)) if m == "curl"
        ));
    }

    #[test]
    fn test_scrape_method_serde_aliases() {
        let method: ScrapeMethod = serde_json::from_str("\"selenium\"").unwrap();
        assert_eq!(method, ScrapeMethod::Browser);
        assert_eq!(serde_json::to_string(&ScrapeMethod::Http).unwrap(), "\"http\"");
    }
}
