use crate::core::{
    CoverLocator, CoverResource, CoverSource, FetchOutcome, FetchStrategy, StrategyKind,
};
use crate::utils::error::{CoverError, Result};
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Issues every request at once and waits for all of them. Failures are
/// dropped from the result and have no effect on the other requests.
pub struct ParallelJoinStrategy {
    source: Arc<dyn CoverSource>,
}

impl ParallelJoinStrategy {
    pub fn new(source: Arc<dyn CoverSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl FetchStrategy for ParallelJoinStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Parallel
    }

    async fn fetch_all(
        &self,
        locators: &[CoverLocator],
        cancel: &CancellationToken,
    ) -> Result<Vec<CoverResource>> {
        if cancel.is_cancelled() {
            return Err(CoverError::UpstreamCancelled);
        }

        tracing::info!("Fetching {} covers concurrently", locators.len());

        // Requests are not coupled to each other or to the caller once issued.
        let detached = CancellationToken::new();
        let outcomes = join_all(
            locators
                .iter()
                .map(|locator| self.source.fetch(locator, &detached)),
        )
        .await;

        // Assembled in reverse of issue order.
        let mut covers = Vec::with_capacity(outcomes.len());
        for (locator, outcome) in locators.iter().zip(outcomes).rev() {
            match outcome {
                FetchOutcome::Success(cover) => covers.push(cover),
                FetchOutcome::Absent(status) => {
                    tracing::debug!("Dropping absent cover {} (status {})", locator, status)
                }
                FetchOutcome::Failed(e) => {
                    tracing::debug!("Dropping failed cover {}: {}", locator, e)
                }
                FetchOutcome::Cancelled => {
                    tracing::debug!("Dropping cancelled cover {}", locator)
                }
            }
        }

        tracing::info!(
            "✅ Retrieved {} of {} covers concurrently",
            covers.len(),
            locators.len()
        );
        Ok(covers)
    }
}
