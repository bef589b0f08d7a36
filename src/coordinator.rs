use crate::error::Error;
use crate::pipeline::Pipeline;
use crate::results::{Summary, SummaryResult};
use crate::target::Target;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// How many pipelines may be in flight at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Concurrency {
    /// One task per target, all started immediately
    #[default]
    Unbounded,
    /// One task per target, at most `n` running at a time
    Limited(usize),
    /// Targets run one after another, each on its own task
    Sequential,
}

impl Concurrency {
    /// `None` means unbounded
    pub fn from_limit(limit: Option<usize>) -> Self {
        match limit {
            None => Concurrency::Unbounded,
            Some(0) | Some(1) => Concurrency::Sequential,
            Some(n) => Concurrency::Limited(n),
        }
    }
}

/// Runs one pipeline per target and returns results in input order
///
/// A failing or panicking pipeline only affects its own entry.
pub async fn run_all(
    pipeline: Arc<Pipeline>,
    targets: Vec<Target>,
    concurrency: Concurrency,
) -> Vec<SummaryResult> {
    ::log::debug!(
        "Running {} pipelines with {:?} concurrency",
        targets.len(),
        concurrency
    );

    match concurrency {
        Concurrency::Sequential => run_sequential(pipeline, targets).await,
        Concurrency::Unbounded => run_concurrent(pipeline, targets, None).await,
        Concurrency::Limited(n) => {
            let semaphore = Arc::new(Semaphore::new(n.max(1)));
            run_concurrent(pipeline, targets, Some(semaphore)).await
        }
    }
}

/// Each target still gets its own task so a panic stays contained to it
async fn run_sequential(pipeline: Arc<Pipeline>, targets: Vec<Target>) -> Vec<SummaryResult> {
    let mut results = Vec::with_capacity(targets.len());

    for (index, target) in targets.into_iter().enumerate() {
        let url = target.input().to_string();
        let handle = spawn_pipeline(Arc::clone(&pipeline), index, target, None);
        results.push(collect(index, url, handle).await);
    }

    results
}

async fn run_concurrent(
    pipeline: Arc<Pipeline>,
    targets: Vec<Target>,
    semaphore: Option<Arc<Semaphore>>,
) -> Vec<SummaryResult> {
    let handles: Vec<_> = targets
        .into_iter()
        .enumerate()
        .map(|(index, target)| {
            let url = target.input().to_string();
            let handle = spawn_pipeline(Arc::clone(&pipeline), index, target, semaphore.clone());
            (index, url, handle)
        })
        .collect();

    // Awaiting in spawn order keeps results aligned with the input,
    // whatever order the tasks actually finish in.
    let mut results = Vec::with_capacity(handles.len());
    for (index, url, handle) in handles {
        results.push(collect(index, url, handle).await);
    }

    results
}

fn spawn_pipeline(
    pipeline: Arc<Pipeline>,
    index: usize,
    target: Target,
    semaphore: Option<Arc<Semaphore>>,
) -> JoinHandle<Result<Summary, Error>> {
    tokio::spawn(async move {
        let _permit = match semaphore {
            Some(semaphore) => semaphore.acquire_owned().await.ok(),
            None => None,
        };
        ::log::trace!("Pipeline {} started for {}", index, target.url());
        pipeline.run(&target).await
    })
}

/// Waits for one pipeline task, turning a panic or abort into `Error::Task`
async fn collect(
    index: usize,
    url: String,
    handle: JoinHandle<Result<Summary, Error>>,
) -> SummaryResult {
    let outcome = match handle.await {
        Ok(outcome) => outcome,
        Err(e) => {
            ::log::error!("Pipeline {} for {} did not complete: {}", index, url, e);
            Err(Error::Task(e.to_string()))
        }
    };

    if let Err(e) = &outcome {
        ::log::warn!("Pipeline {} for {} failed: {}", index, url, e);
    }

    SummaryResult {
        index,
        url,
        outcome,
    }
}
