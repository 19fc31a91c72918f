use crate::domain::model::{
    Book, CoverLocator, CoverResource, CoverVariant, FetchOutcome, StrategyKind,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Retrieves one cover. Implementations classify every result into a
/// [`FetchOutcome`] and must return [`FetchOutcome::Cancelled`] once `cancel`
/// is raised, whether before or during the request.
#[async_trait]
pub trait CoverSource: Send + Sync {
    async fn fetch(&self, locator: &CoverLocator, cancel: &CancellationToken) -> FetchOutcome;
}

/// Fetches a collection of covers and decides how per-item failures affect
/// the aggregate.
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    async fn fetch_all(
        &self,
        locators: &[CoverLocator],
        cancel: &CancellationToken,
    ) -> Result<Vec<CoverResource>>;
}

#[async_trait]
pub trait BooksRepository: Send + Sync {
    async fn get_books(&self) -> Result<Vec<Book>>;
    /// Yields books one at a time, each with its author attached.
    fn get_books_stream(&self) -> BoxStream<'_, Book>;
    async fn get_books_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Book>>;
    async fn get_book(&self, id: Uuid) -> Result<Option<Book>>;
    async fn add_book(&self, book: Book) -> Result<()>;
    async fn save_changes(&self) -> Result<bool>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn resource_kind(&self) -> &str;
    fn timeout_seconds(&self) -> Option<u64>;
    fn strategy(&self) -> StrategyKind;
    fn variants(&self) -> Vec<CoverVariant>;
}
