//! Error types for the fetch, extract and summarize pipeline

use thiserror::Error;

/// Errors raised while retrieving a page
#[derive(Debug, Error)]
pub enum FetchError {
    /// Failed to build the HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    /// Transport-level failure of a plain HTTP request
    #[error("HTTP request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("HTTP request to {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The chromedriver process could not be started or never became ready
    #[error("Failed to launch browser driver: {0}")]
    BrowserLaunch(String),

    /// A WebDriver session could not be created
    #[error("Failed to open WebDriver session at {webdriver_url}")]
    Session {
        webdriver_url: String,
        #[source]
        source: fantoccini::error::NewSessionError,
    },

    /// Navigation or page source retrieval failed inside the browser
    #[error("Browser failed while {context} {url}")]
    Navigation {
        context: &'static str,
        url: String,
        #[source]
        source: fantoccini::error::CmdError,
    },
}

/// Errors raised by the text-generation service
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Transport-level failure talking to the service
    #[error("Request to the summarization service failed")]
    Http(#[source] reqwest::Error),

    /// Service answered with a non-success status
    #[error("Summarization service returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Response body did not contain a completion
    #[error("Malformed response from summarization service: {0}")]
    MalformedResponse(String),
}

/// Errors in user-supplied configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid URL '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid scrape method '{0}': expected 'http' or 'browser'")]
    InvalidScrapeMethod(String),

    #[error("Missing API key: set OPENAI_API_KEY in the environment or a .env file")]
    MissingApiKey,

    #[error("API key contains characters not allowed in an HTTP header")]
    InvalidApiKey,

    #[error("Failed to create HTTP client for the summarization service")]
    HttpClient(#[source] reqwest::Error),

    #[error("Failed to read config file")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config")]
    Json(#[from] serde_json::Error),
}

/// Top-level error for one target or the whole run
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Summarize(#[from] SummarizeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The task running a pipeline panicked or was aborted
    #[error("Pipeline task failed: {0}")]
    Task(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
