use std::sync::Arc;
use std::time::Duration;

use humanizer_storage::{CleanupReport, FileStore};
use tokio::time::interval;

/// Periodically deletes uploads older than `max_age`.
#[derive(Clone)]
pub struct CleanupService {
    store: Arc<FileStore>,
    interval: Duration,
    max_age: Duration,
}

impl CleanupService {
    pub fn new(store: Arc<FileStore>, interval: Duration, max_age: Duration) -> Self {
        Self {
            store,
            interval,
            max_age,
        }
    }

    /// Start the background cleanup task.
    /// Returns a JoinHandle so the caller can abort it on shutdown.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut cleanup_interval = interval(self.interval);

            loop {
                cleanup_interval.tick().await;

                tracing::debug!("Starting scheduled cleanup of expired uploads");

                if let Err(e) = self.run_once().await {
                    tracing::error!(error = %e, "Upload cleanup task failed");
                }
            }
        })
    }

    #[tracing::instrument(skip(self), fields(max_age_secs = self.max_age.as_secs()))]
    pub async fn run_once(&self) -> Result<CleanupReport, anyhow::Error> {
        let report = self.store.cleanup(self.max_age).await?;
        Ok(report)
    }
}
