use crate::core::parallel::ParallelJoinStrategy;
use crate::core::sequential::SequentialAbortStrategy;
use crate::core::{
    CoverLocator, CoverResource, CoverSource, CoverVariant, FetchStrategy, StrategyKind,
};
use crate::utils::error::{CoverError, Result};
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Entry point for fetching every cover of a book.
///
/// Results are best-effort: depending on the strategy and the health of the
/// remote service the returned list may hold fewer covers than there are
/// variants.
pub struct CoverOrchestrator {
    strategy: Box<dyn FetchStrategy>,
    variants: Vec<CoverVariant>,
}

impl CoverOrchestrator {
    /// Sequential-abort over the reference variants.
    pub fn new(source: Arc<dyn CoverSource>) -> Self {
        Self::with_kind(source, StrategyKind::default(), CoverVariant::reference_set())
    }

    pub fn with_kind(
        source: Arc<dyn CoverSource>,
        kind: StrategyKind,
        variants: Vec<CoverVariant>,
    ) -> Self {
        let strategy: Box<dyn FetchStrategy> = match kind {
            StrategyKind::Sequential => Box::new(SequentialAbortStrategy::new(source)),
            StrategyKind::Parallel => Box::new(ParallelJoinStrategy::new(source)),
        };
        Self::with_strategy(strategy, variants)
    }

    pub fn with_strategy(strategy: Box<dyn FetchStrategy>, variants: Vec<CoverVariant>) -> Self {
        Self { strategy, variants }
    }

    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub fn locators_for(&self, book_id: &Uuid) -> Vec<CoverLocator> {
        self.variants
            .iter()
            .map(|variant| variant.locator_for(book_id))
            .collect()
    }

    pub async fn fetch_covers_for(
        &self,
        book_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<Vec<CoverResource>> {
        let locators = self.locators_for(&book_id);
        tracing::debug!(
            "Fetching {} covers for book {} with {} strategy",
            locators.len(),
            book_id,
            self.strategy.kind()
        );

        self.strategy.fetch_all(&locators, cancel).await
    }
}

/// Runs `work` until it finishes or `cancel` is raised, whichever comes first.
///
/// Paths that never observe the token themselves (a parallel join, a single
/// cover lookup) still stop promptly; `work` is dropped on cancellation.
pub async fn until_cancelled<F, T, E>(
    work: F,
    cancel: &CancellationToken,
) -> std::result::Result<T, E>
where
    F: Future<Output = std::result::Result<T, E>>,
    E: From<CoverError>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(CoverError::UpstreamCancelled.into()),
        result = work => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{cover, Scripted, ScriptedSource};
    use std::time::Duration;

    #[test]
    fn test_locators_follow_variants() {
        let source = Arc::new(ScriptedSource::all_ok());
        let orchestrator = CoverOrchestrator::new(source);
        let id = Uuid::nil();

        let keys: Vec<String> = orchestrator
            .locators_for(&id)
            .iter()
            .map(|l| l.to_string())
            .collect();

        assert_eq!(
            keys,
            vec![
                format!("{}-dummycover1", id),
                format!("{}-dummycover2?returnFault=true", id),
                format!("{}-dummycover3", id),
                format!("{}-dummycover4", id),
                format!("{}-dummycover5", id),
            ]
        );
    }

    #[test]
    fn test_defaults_to_sequential() {
        let orchestrator = CoverOrchestrator::new(Arc::new(ScriptedSource::all_ok()));
        assert_eq!(orchestrator.strategy_kind(), StrategyKind::Sequential);
    }

    #[tokio::test]
    async fn test_fetch_covers_for_with_faulting_second_variant() {
        let id = Uuid::nil();
        let faulting = format!("{}-dummycover2", id);
        let source = Arc::new(ScriptedSource::all_ok().with(&faulting, Scripted::Absent(500)));
        let orchestrator = CoverOrchestrator::new(source.clone());

        let covers = orchestrator
            .fetch_covers_for(id, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(covers, vec![cover(&format!("{}-dummycover1", id))]);
        assert_eq!(source.issued().len(), 2);
    }

    #[tokio::test]
    async fn test_parallel_kind_collects_remaining_covers() {
        let id = Uuid::nil();
        let faulting = format!("{}-dummycover2", id);
        let source = Arc::new(ScriptedSource::all_ok().with(&faulting, Scripted::Absent(500)));
        let orchestrator = CoverOrchestrator::with_kind(
            source.clone(),
            StrategyKind::Parallel,
            CoverVariant::reference_set(),
        );

        let covers = orchestrator
            .fetch_covers_for(id, &CancellationToken::new())
            .await
            .unwrap();

        let ids: Vec<String> = covers.into_iter().map(|c| c.id).collect();
        assert_eq!(
            ids,
            vec![
                format!("{}-dummycover5", id),
                format!("{}-dummycover4", id),
                format!("{}-dummycover3", id),
                format!("{}-dummycover1", id),
            ]
        );
        assert_eq!(source.issued().len(), 5);
    }

    #[tokio::test]
    async fn test_caller_cancellation_propagates() {
        let orchestrator = CoverOrchestrator::new(Arc::new(ScriptedSource::all_ok()));
        let token = CancellationToken::new();
        token.cancel();

        let result = orchestrator.fetch_covers_for(Uuid::new_v4(), &token).await;
        assert!(matches!(result, Err(CoverError::UpstreamCancelled)));
    }

    #[tokio::test]
    async fn test_until_cancelled_stops_work_that_ignores_the_token() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let work = std::future::pending::<Result<()>>();
        let result = tokio::time::timeout(Duration::from_secs(5), until_cancelled(work, &token))
            .await
            .expect("cancellation did not interrupt the work");

        assert!(matches!(result, Err(CoverError::UpstreamCancelled)));
    }

    #[tokio::test]
    async fn test_until_cancelled_interrupts_parallel_join() {
        let id = Uuid::nil();
        let slow = format!("{}-dummycover1", id);
        let source = Arc::new(
            ScriptedSource::all_ok().with(&slow, Scripted::Delayed(Duration::from_secs(30))),
        );
        let orchestrator = CoverOrchestrator::with_kind(
            source.clone(),
            StrategyKind::Parallel,
            CoverVariant::reference_set(),
        );
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let started = std::time::Instant::now();
        let result = until_cancelled(orchestrator.fetch_covers_for(id, &token), &token).await;

        assert!(matches!(result, Err(CoverError::UpstreamCancelled)));
        assert!(started.elapsed() < Duration::from_secs(30));
        assert_eq!(source.issued().len(), 5);
    }

    #[tokio::test]
    async fn test_until_cancelled_passes_result_through() {
        let token = CancellationToken::new();
        let result = until_cancelled(async { Ok::<_, CoverError>(7) }, &token).await;
        assert_eq!(result.unwrap(), 7);
    }
}
