use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::AppError;

/// Trait for plain HTTP GET fetches (backend API and document URLs).
///
/// Abstracted as a trait so tests can serve canned bodies without a network.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Perform one GET and return the full response body.
    ///
    /// Transport failures, non-success statuses and body read failures all
    /// come back as `AppError::Fetch`. No retry.
    async fn fetch_sync(&self, url: &str) -> Result<Bytes, AppError>;
}

/// reqwest implementation of Fetcher.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_sync(&self, url: &str) -> Result<Bytes, AppError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::Fetch(format!("GET {url} failed: {e}")))?;

        response
            .bytes()
            .await
            .map_err(|e| AppError::Fetch(format!("Failed to read body from {url}: {e}")))
    }
}

/// A fetch running on its own task, delivering into a single-slot channel.
///
/// Dropping it aborts the task if it has not finished yet.
pub struct PendingFetch {
    receiver: oneshot::Receiver<Result<Bytes, AppError>>,
    task: JoinHandle<()>,
}

impl PendingFetch {
    /// Wait for the fetch result.
    pub async fn wait(mut self) -> Result<Bytes, AppError> {
        match (&mut self.receiver).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Fetch("fetch task ended without a result".into())),
        }
    }
}

impl Drop for PendingFetch {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start a fetch on a separate task and return its handoff channel.
pub fn fetch_async(fetcher: Arc<dyn Fetcher>, url: String) -> PendingFetch {
    let (sender, receiver) = oneshot::channel();
    let task = tokio::spawn(async move {
        let result = fetcher.fetch_sync(&url).await;
        if sender.send(result).is_err() {
            tracing::debug!("fetch result for {url} discarded, receiver gone");
        }
    });
    PendingFetch { receiver, task }
}

/// Run two fetches concurrently and wait for both, bounded by `budget`.
///
/// The outer error is the timeout; the inner results are each fetch's own
/// outcome so callers can tell which one failed.
pub async fn fetch_both(
    fetcher: Arc<dyn Fetcher>,
    first: String,
    second: String,
    budget: Duration,
) -> Result<(Result<Bytes, AppError>, Result<Bytes, AppError>), AppError> {
    let first = fetch_async(fetcher.clone(), first);
    let second = fetch_async(fetcher, second);

    tokio::time::timeout(budget, async { tokio::join!(first.wait(), second.wait()) })
        .await
        .map_err(|_| AppError::Fetch(format!("upstream fetches exceeded {budget:?}")))
}
