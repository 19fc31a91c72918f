use crate::core::orchestrator::CoverOrchestrator;
use crate::core::{Book, BookDto, BookForCreation, BookWithCoversDto, BooksRepository};
use crate::utils::error::{CoverError, Result};
use futures::stream::{BoxStream, StreamExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Combines the book store with the cover orchestrator into the shapes the
/// HTTP layer hands back to its callers.
pub struct CatalogService<R: BooksRepository> {
    repository: Arc<R>,
    orchestrator: CoverOrchestrator,
}

impl<R: BooksRepository> CatalogService<R> {
    pub fn new(repository: Arc<R>, orchestrator: CoverOrchestrator) -> Self {
        Self {
            repository,
            orchestrator,
        }
    }

    pub async fn list_books(&self) -> Result<Vec<BookDto>> {
        let books = self.repository.get_books().await?;
        Ok(books.iter().map(BookDto::from).collect())
    }

    /// Streams the catalog as DTOs without collecting it first.
    pub fn stream_books(&self) -> BoxStream<'_, BookDto> {
        self.repository
            .get_books_stream()
            .map(|book| BookDto::from(&book))
            .boxed()
    }

    pub async fn get_book_with_covers(
        &self,
        id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<BookWithCoversDto> {
        let book = self
            .repository
            .get_book(id)
            .await?
            .ok_or(CoverError::BookNotFound(id))?;

        let covers = self.orchestrator.fetch_covers_for(id, cancel).await?;
        tracing::info!("✅ Book {} returned with {} covers", id, covers.len());

        Ok(BookWithCoversDto::new(&book, covers))
    }

    pub async fn create_book(&self, creation: BookForCreation) -> Result<Book> {
        let book = creation.into_book();
        let id = book.id;

        self.repository.add_book(book).await?;
        self.repository.save_changes().await?;

        // Re-read so the author is attached.
        self.repository
            .get_book(id)
            .await?
            .ok_or(CoverError::BookNotFound(id))
    }
}
