use crate::error::ConfigError;
use crate::target::ScrapeMethod;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for the rendered-browser fetch strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebDriverConfig {
    /// Path to the chromedriver executable spawned per fetch
    #[serde(default = "default_chromedriver_path")]
    pub chromedriver_path: PathBuf,

    /// Path to the Chrome binary chromedriver should drive
    #[serde(default = "default_chrome_binary_path")]
    pub chrome_binary_path: PathBuf,

    /// Existing WebDriver server; when set no chromedriver process is spawned
    #[serde(default)]
    pub webdriver_url: Option<String>,

    /// Seconds to wait after navigation for client-side rendering
    #[serde(default = "default_settle_delay_secs")]
    pub settle_delay_secs: u64,

    /// Browser window size as `width,height`
    #[serde(default = "default_window_size")]
    pub window_size: String,

    /// Seconds to wait for a spawned chromedriver to accept connections
    #[serde(default = "default_startup_timeout_secs")]
    pub startup_timeout_secs: u64,
}

/// Configuration for the plain HTTP fetch strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every GET
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Configuration for the text-generation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    /// Bearer credential; never serialized
    #[serde(default, skip_serializing)]
    pub api_key: String,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name used for every target
    #[serde(default = "default_model")]
    pub model: String,
}

/// Complete configuration for a summarization run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scrape_method: ScrapeMethod,

    /// Maximum number of pipelines in flight; unbounded when absent
    #[serde(default)]
    pub max_concurrency: Option<usize>,

    #[serde(default)]
    pub webdriver: WebDriverConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub summarizer: SummarizerConfig,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }
}

fn default_chromedriver_path() -> PathBuf {
    PathBuf::from("./chromedriver-linux64/chromedriver")
}

fn default_chrome_binary_path() -> PathBuf {
    PathBuf::from("./chrome-linux64/chrome")
}

fn default_settle_delay_secs() -> u64 {
    5
}

fn default_window_size() -> String {
    "1920,1080".to_string()
}

fn default_startup_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            chromedriver_path: default_chromedriver_path(),
            chrome_binary_path: default_chrome_binary_path(),
            webdriver_url: None,
            settle_delay_secs: default_settle_delay_secs(),
            window_size: default_window_size(),
            startup_timeout_secs: default_startup_timeout_secs(),
        }
    }
}

impl WebDriverConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
        }
    }
}

impl SummarizerConfig {
    /// Create a configuration for the given credential with default endpoint and model
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Replace the credential and endpoint with values that are present and non-empty
    pub fn apply_overrides(&mut self, api_key: Option<String>, base_url: Option<String>) {
        if let Some(api_key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = api_key;
        }
        if let Some(base_url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = base_url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }
}
