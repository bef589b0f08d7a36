use crate::config::WebDriverConfig;
use crate::error::FetchError;
use crate::fetchers::PageFetcher;
use crate::results::Page;
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use serde_json::{Map, Value, json};
use std::process::Stdio;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tokio::time::Instant;

const DRIVER_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Fetches fully rendered pages through headless Chrome
///
/// Every call opens its own WebDriver session, and unless a `webdriver_url`
/// is configured, its own chromedriver process, so concurrent fetches never
/// share browser state.
#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    config: WebDriverConfig,
}

impl BrowserFetcher {
    pub fn new(config: WebDriverConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let session = BrowserSession::open(&self.config).await?;

        let rendered = session.render(url, self.config.settle_delay()).await;

        // Teardown runs on success and failure alike
        session.close().await;

        let source = rendered?;
        Ok(Page::new(url, source.into_bytes()))
    }
}

/// A WebDriver session plus the chromedriver process backing it, if we spawned one
///
/// The child is spawned with `kill_on_drop`, so an early return or a panic
/// between `open` and `close` still reaps the process.
struct BrowserSession {
    client: Client,
    driver: Option<Child>,
    webdriver_url: String,
}

impl BrowserSession {
    async fn open(config: &WebDriverConfig) -> Result<Self, FetchError> {
        let (webdriver_url, driver) = match &config.webdriver_url {
            Some(url) => (url.clone(), None),
            None => {
                let (url, child) = spawn_driver(config).await?;
                (url, Some(child))
            }
        };

        let mut builder = ClientBuilder::native();
        builder.capabilities(chrome_capabilities(config));

        let client = builder
            .connect(&webdriver_url)
            .await
            .map_err(|source| FetchError::Session {
                webdriver_url: webdriver_url.clone(),
                source,
            })?;

        ::log::debug!("Opened WebDriver session at {}", webdriver_url);

        Ok(Self {
            client,
            driver,
            webdriver_url,
        })
    }

    async fn render(&self, url: &str, settle_delay: Duration) -> Result<String, FetchError> {
        self.client
            .goto(url)
            .await
            .map_err(|source| FetchError::Navigation {
                context: "navigating to",
                url: url.to_string(),
                source,
            })?;

        ::log::trace!("Waiting {:?} for {} to settle", settle_delay, url);
        tokio::time::sleep(settle_delay).await;

        self.client
            .source()
            .await
            .map_err(|source| FetchError::Navigation {
                context: "reading source of",
                url: url.to_string(),
                source,
            })
    }

    async fn close(self) {
        if let Err(e) = self.client.close().await {
            ::log::warn!(
                "Failed to close WebDriver session at {}: {}",
                self.webdriver_url,
                e
            );
        }

        if let Some(mut driver) = self.driver {
            if let Err(e) = driver.kill().await {
                ::log::warn!("Failed to kill chromedriver: {}", e);
            } else {
                ::log::debug!("Stopped chromedriver at {}", self.webdriver_url);
            }
        }
    }
}

/// Capabilities for an isolated headless Chrome with a fixed viewport and no GPU
pub fn chrome_capabilities(config: &WebDriverConfig) -> Map<String, Value> {
    let args = vec![
        "--headless".to_string(),
        "--disable-gpu".to_string(),
        format!("--window-size={}", config.window_size),
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
    ];

    let mut caps = Map::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert(
        "goog:chromeOptions".to_string(),
        json!({
            "args": args,
            "binary": config.chrome_binary_path.to_string_lossy(),
        }),
    );
    caps
}

/// Starts chromedriver on a free local port and waits until it accepts connections
async fn spawn_driver(config: &WebDriverConfig) -> Result<(String, Child), FetchError> {
    let port = free_port()?;

    let mut child = Command::new(&config.chromedriver_path)
        .arg(format!("--port={}", port))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            FetchError::BrowserLaunch(format!(
                "{}: {}",
                config.chromedriver_path.display(),
                e
            ))
        })?;

    ::log::debug!(
        "Spawned chromedriver {} on port {}",
        config.chromedriver_path.display(),
        port
    );

    wait_until_listening(&mut child, port, config.startup_timeout()).await?;

    Ok((format!("http://127.0.0.1:{}", port), child))
}

/// Asks the OS for an unused local port
fn free_port() -> Result<u16, FetchError> {
    let listener = std::net::TcpListener::bind(("127.0.0.1", 0))
        .map_err(|e| FetchError::BrowserLaunch(format!("no free local port: {}", e)))?;
    let port = listener
        .local_addr()
        .map_err(|e| FetchError::BrowserLaunch(format!("no free local port: {}", e)))?
        .port();
    Ok(port)
}

async fn wait_until_listening(
    child: &mut Child,
    port: u16,
    timeout: Duration,
) -> Result<(), FetchError> {
    let deadline = Instant::now() + timeout;

    loop {
        if TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
            return Ok(());
        }

        if let Ok(Some(status)) = child.try_wait() {
            return Err(FetchError::BrowserLaunch(format!(
                "chromedriver exited before accepting connections ({})",
                status
            )));
        }

        if Instant::now() >= deadline {
            return Err(FetchError::BrowserLaunch(format!(
                "chromedriver did not listen on port {} within {:?}",
                port, timeout
            )));
        }

        tokio::time::sleep(DRIVER_POLL_INTERVAL).await;
    }
}
