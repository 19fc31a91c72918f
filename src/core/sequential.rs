use crate::core::{
    CoverLocator, CoverResource, CoverSource, FetchOutcome, FetchStrategy, StrategyKind,
};
use crate::utils::error::{CoverError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Issues one request at a time, in order, and stops at the first cover that
/// is absent or fails.
pub struct SequentialAbortStrategy {
    source: Arc<dyn CoverSource>,
}

impl SequentialAbortStrategy {
    pub fn new(source: Arc<dyn CoverSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl FetchStrategy for SequentialAbortStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Sequential
    }

    async fn fetch_all(
        &self,
        locators: &[CoverLocator],
        cancel: &CancellationToken,
    ) -> Result<Vec<CoverResource>> {
        // Cancelling the child never touches the caller's token, but the
        // caller cancelling reaches the child.
        let abort = cancel.child_token();
        let mut covers = Vec::new();

        tracing::info!("Fetching {} covers one by one", locators.len());

        for (index, locator) in locators.iter().enumerate() {
            if abort.is_cancelled() {
                tracing::debug!(
                    "Stopping before {}; {} locators never issued",
                    locator,
                    locators.len() - index
                );
                break;
            }

            match self.source.fetch(locator, &abort).await {
                FetchOutcome::Success(cover) => covers.push(cover),
                FetchOutcome::Absent(status) => {
                    tracing::warn!(
                        "❌ Cover {} absent (status {}), aborting remaining requests",
                        locator,
                        status
                    );
                    abort.cancel();
                }
                FetchOutcome::Failed(e) => {
                    tracing::warn!(
                        "❌ Cover {} failed ({}), aborting remaining requests",
                        locator,
                        e
                    );
                    abort.cancel();
                }
                FetchOutcome::Cancelled => {
                    tracing::debug!("Cover {} cancelled", locator);
                    break;
                }
            }
        }

        // Caller cancellation wins over partial results
        if cancel.is_cancelled() {
            tracing::info!(
                "Caller cancelled after {} covers were retrieved",
                covers.len()
            );
            return Err(CoverError::UpstreamCancelled);
        }

        tracing::info!(
            "✅ Retrieved {} of {} covers sequentially",
            covers.len(),
            locators.len()
        );
        Ok(covers)
    }
}
