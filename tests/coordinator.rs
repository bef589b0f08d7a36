//! Ordering, isolation and concurrency properties of the coordinator, using in-process mocks

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use summarize_page::fetchers::PageFetcher;
use summarize_page::summarizer::Summarize;
use summarize_page::{
    Concurrency, Error, ExtractedContent, FetchError, Page, Pipeline, ScrapeMethod,
    SummarizeError, Target, run_all,
};

enum Behavior {
    Serve { delay: Duration, title: &'static str },
    Fail,
    Panic,
}

/// Serves a page titled per URL after a per-URL delay and records completion order
struct MockFetcher {
    behaviors: HashMap<String, Behavior>,
    completed: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockFetcher {
    fn new(behaviors: Vec<(&str, Behavior)>) -> Self {
        Self {
            behaviors: behaviors
                .into_iter()
                .map(|(url, b)| (format!("http://{}", url), b))
                .collect(),
            completed: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let result = match self.behaviors.get(url) {
            Some(Behavior::Serve { delay, title }) => {
                tokio::time::sleep(*delay).await;
                let html = format!(
                    "<html><head><title>{}</title></head><body><p>body of {}</p></body></html>",
                    title, title
                );
                Ok(Page::new(url, html))
            }
            Some(Behavior::Fail) | None => Err(FetchError::BrowserLaunch(format!(
                "cannot reach {}",
                url
            ))),
            Some(Behavior::Panic) => panic!("fetcher blew up on {}", url),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.lock().unwrap().push(url.to_string());
        result
    }
}

/// Echoes the title and records every prompt input
#[derive(Default)]
struct MockSummarizer {
    calls: Mutex<Vec<(ExtractedContent, String)>>,
}

#[async_trait]
impl Summarize for MockSummarizer {
    async fn summarize(
        &self,
        content: &ExtractedContent,
        model: &str,
    ) -> Result<String, SummarizeError> {
        self.calls
            .lock()
            .unwrap()
            .push((content.clone(), model.to_string()));
        Ok(format!("summary of {}", content.title))
    }
}

fn targets(urls: &[&str], method: ScrapeMethod) -> Vec<Target> {
    urls.iter()
        .map(|url| Target::new(*url, method, "test-model").unwrap())
        .collect()
}

fn pipeline(fetcher: Arc<MockFetcher>, summarizer: Arc<MockSummarizer>) -> Arc<Pipeline> {
    Arc::new(Pipeline::new(fetcher.clone(), fetcher, summarizer))
}

fn serve(delay_ms: u64, title: &'static str) -> Behavior {
    Behavior::Serve {
        delay: Duration::from_millis(delay_ms),
        title,
    }
}

fn markdown(result: &summarize_page::SummaryResult) -> &str {
    &result.outcome.as_ref().unwrap().markdown
}

#[tokio::test]
async fn test_results_follow_input_order_not_completion_order() {
    let fetcher = Arc::new(MockFetcher::new(vec![
        ("a.test", serve(300, "A")),
        ("b.test", serve(10, "B")),
        ("c.test", serve(150, "C")),
    ]));
    let summarizer = Arc::new(MockSummarizer::default());

    let results = run_all(
        pipeline(fetcher.clone(), summarizer),
        targets(&["a.test", "b.test", "c.test"], ScrapeMethod::Http),
        Concurrency::Unbounded,
    )
    .await;

    assert_eq!(
        fetcher.completed(),
        vec!["http://b.test", "http://c.test", "http://a.test"]
    );

    let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec!["a.test", "b.test", "c.test"]);
    assert_eq!(markdown(&results[0]), "summary of A");
    assert_eq!(markdown(&results[1]), "summary of B");
    assert_eq!(markdown(&results[2]), "summary of C");
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.index, i);
    }
}

#[tokio::test]
async fn test_failure_does_not_affect_other_targets() {
    let fetcher = Arc::new(MockFetcher::new(vec![
        ("a.test", serve(50, "A")),
        ("b.test", Behavior::Fail),
        ("c.test", serve(20, "C")),
    ]));
    let summarizer = Arc::new(MockSummarizer::default());

    let results = run_all(
        pipeline(fetcher, summarizer.clone()),
        targets(&["a.test", "b.test", "c.test"], ScrapeMethod::Http),
        Concurrency::Unbounded,
    )
    .await;

    assert_eq!(markdown(&results[0]), "summary of A");
    assert!(matches!(
        results[1].outcome,
        Err(Error::Fetch(FetchError::BrowserLaunch(_)))
    ));
    assert_eq!(markdown(&results[2]), "summary of C");

    // The failed target never reaches the summarizer
    assert_eq!(summarizer.calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_panicking_pipeline_is_reported_as_task_error() {
    for concurrency in [
        Concurrency::Unbounded,
        Concurrency::Limited(2),
        Concurrency::Sequential,
    ] {
        let fetcher = Arc::new(MockFetcher::new(vec![
            ("a.test", Behavior::Panic),
            ("b.test", serve(10, "B")),
        ]));
        let summarizer = Arc::new(MockSummarizer::default());

        let results = run_all(
            pipeline(fetcher, summarizer),
            targets(&["a.test", "b.test"], ScrapeMethod::Http),
            concurrency,
        )
        .await;

        assert_eq!(results.len(), 2, "{:?}", concurrency);
        assert!(
            matches!(results[0].outcome, Err(Error::Task(_))),
            "{:?}: {:?}",
            concurrency,
            results[0].outcome
        );
        assert_eq!(markdown(&results[1]), "summary of B", "{:?}", concurrency);
    }
}

#[tokio::test]
async fn test_unbounded_runs_pipelines_concurrently() {
    let fetcher = Arc::new(MockFetcher::new(vec![
        ("a.test", serve(300, "A")),
        ("b.test", serve(300, "B")),
        ("c.test", serve(300, "C")),
    ]));
    let summarizer = Arc::new(MockSummarizer::default());

    let start = Instant::now();
    let results = run_all(
        pipeline(fetcher.clone(), summarizer),
        targets(&["a.test", "b.test", "c.test"], ScrapeMethod::Http),
        Concurrency::Unbounded,
    )
    .await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert!(start.elapsed() < Duration::from_millis(800));
    assert_eq!(fetcher.max_in_flight.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_limited_caps_in_flight_pipelines() {
    let fetcher = Arc::new(MockFetcher::new(vec![
        ("a.test", serve(100, "A")),
        ("b.test", serve(100, "B")),
        ("c.test", serve(100, "C")),
        ("d.test", serve(100, "D")),
    ]));
    let summarizer = Arc::new(MockSummarizer::default());

    let results = run_all(
        pipeline(fetcher.clone(), summarizer),
        targets(&["a.test", "b.test", "c.test", "d.test"], ScrapeMethod::Http),
        Concurrency::Limited(2),
    )
    .await;

    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r.is_ok()));
    assert!(fetcher.max_in_flight.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn test_sequential_runs_one_at_a_time_in_order() {
    let fetcher = Arc::new(MockFetcher::new(vec![
        ("a.test", serve(100, "A")),
        ("b.test", serve(10, "B")),
    ]));
    let summarizer = Arc::new(MockSummarizer::default());

    let results = run_all(
        pipeline(fetcher.clone(), summarizer),
        targets(&["a.test", "b.test"], ScrapeMethod::Http),
        Concurrency::Sequential,
    )
    .await;

    assert_eq!(fetcher.completed(), vec!["http://a.test", "http://b.test"]);
    assert_eq!(fetcher.max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(markdown(&results[0]), "summary of A");
    assert_eq!(markdown(&results[1]), "summary of B");
}

#[tokio::test]
async fn test_pipeline_routes_by_scrape_method_and_passes_model() {
    let http = Arc::new(MockFetcher::new(vec![("a.test", serve(0, "From HTTP"))]));
    let browser = Arc::new(MockFetcher::new(vec![("a.test", serve(0, "From Browser"))]));
    let summarizer = Arc::new(MockSummarizer::default());
    let pipeline = Pipeline::new(http.clone(), browser.clone(), summarizer.clone());

    let target = Target::new("a.test", ScrapeMethod::Browser, "test-model").unwrap();
    let summary = pipeline.run(&target).await.unwrap();

    assert_eq!(summary.title, "From Browser");
    assert_eq!(summary.markdown, "summary of From Browser");
    assert!(http.completed().is_empty());
    assert_eq!(browser.completed(), vec!["http://a.test"]);

    let calls = summarizer.calls.lock().unwrap();
    assert_eq!(calls[0].0.text, "body of From Browser");
    assert_eq!(calls[0].1, "test-model");
}
