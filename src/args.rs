use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use summarize_page::{Config, ScrapeMethod};

#[derive(Parser, Debug)]
#[command(name = "summarize-page")]
#[command(about = "Fetch webpages and summarize them with a language model")]
#[command(version)]
pub struct Args {
    /// URLs to summarize; http:// is assumed when no scheme is given
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// How to fetch pages
    #[arg(long, value_enum)]
    pub scrape_method: Option<ScrapeMethodArg>,

    /// Path to the chromedriver executable
    #[arg(long)]
    pub chromedriver_path: Option<PathBuf>,

    /// Path to the Chrome binary
    #[arg(long)]
    pub chrome_binary_path: Option<PathBuf>,

    /// Use a running WebDriver server instead of spawning chromedriver
    #[arg(long, env = "WEBDRIVER_URL")]
    pub webdriver_url: Option<String>,

    /// Seconds to let a page render before reading it (browser method)
    #[arg(long)]
    pub settle_delay: Option<u64>,

    /// Model to use for summarization
    #[arg(long)]
    pub model: Option<String>,

    /// Maximum number of URLs processed at once (1 runs them sequentially)
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// JSON configuration file; flags given here override it
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScrapeMethodArg {
    /// Plain HTTP GET
    #[value(alias = "requests")]
    Http,
    /// Headless Chrome via WebDriver
    #[value(alias = "selenium")]
    Browser,
}

impl From<ScrapeMethodArg> for ScrapeMethod {
    fn from(arg: ScrapeMethodArg) -> Self {
        match arg {
            ScrapeMethodArg::Http => ScrapeMethod::Http,
            ScrapeMethodArg::Browser => ScrapeMethod::Browser,
        }
    }
}

impl Args {
    /// Overlay command-line flags onto a base configuration
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(method) = self.scrape_method {
            config.scrape_method = method.into();
        }
        if let Some(path) = &self.chromedriver_path {
            config.webdriver.chromedriver_path = path.clone();
        }
        if let Some(path) = &self.chrome_binary_path {
            config.webdriver.chrome_binary_path = path.clone();
        }
        if let Some(url) = self.webdriver_url.as_ref().filter(|u| !u.is_empty()) {
            config.webdriver.webdriver_url = Some(url.clone());
        }
        if let Some(secs) = self.settle_delay {
            config.webdriver.settle_delay_secs = secs;
        }
        if let Some(model) = &self.model {
            config.summarizer.model = model.clone();
        }
        if let Some(n) = self.concurrency {
            config.max_concurrency = Some(n);
        }
        config
    }
}
