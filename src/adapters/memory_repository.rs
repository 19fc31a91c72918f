use crate::core::{Author, Book, BooksRepository};
use crate::utils::error::Result;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Store {
    authors: HashMap<Uuid, Author>,
    books: Vec<Book>,
    pending: Vec<Book>,
}

/// Book store kept in memory. Added books stay pending until
/// [`BooksRepository::save_changes`] is called.
#[derive(Default)]
pub struct InMemoryBooksRepository {
    store: Mutex<Store>,
}

impl InMemoryBooksRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(authors: Vec<Author>, books: Vec<Book>) -> Self {
        let store = Store {
            authors: authors.into_iter().map(|a| (a.id, a)).collect(),
            books,
            pending: Vec::new(),
        };
        Self {
            store: Mutex::new(store),
        }
    }
}

fn with_author(store: &Store, book: &Book) -> Book {
    let mut book = book.clone();
    book.author = store.authors.get(&book.author_id).cloned();
    book
}

#[async_trait]
impl BooksRepository for InMemoryBooksRepository {
    async fn get_books(&self) -> Result<Vec<Book>> {
        let store = self.store.lock().await;
        Ok(store.books.iter().map(|b| with_author(&store, b)).collect())
    }

    fn get_books_stream(&self) -> BoxStream<'_, Book> {
        // Snapshot under the lock; the guard is not held while the caller consumes.
        stream::once(async move {
            let store = self.store.lock().await;
            store
                .books
                .iter()
                .map(|b| with_author(&store, b))
                .collect::<Vec<_>>()
        })
        .flat_map(stream::iter)
        .boxed()
    }

    async fn get_books_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Book>> {
        let store = self.store.lock().await;
        Ok(store
            .books
            .iter()
            .filter(|b| ids.contains(&b.id))
            .map(|b| with_author(&store, b))
            .collect())
    }

    async fn get_book(&self, id: Uuid) -> Result<Option<Book>> {
        let store = self.store.lock().await;
        Ok(store
            .books
            .iter()
            .find(|b| b.id == id)
            .map(|b| with_author(&store, b)))
    }

    async fn add_book(&self, book: Book) -> Result<()> {
        let mut store = self.store.lock().await;
        store.pending.push(book);
        Ok(())
    }

    async fn save_changes(&self) -> Result<bool> {
        let mut store = self.store.lock().await;
        let pending = std::mem::take(&mut store.pending);
        let saved = !pending.is_empty();
        store.books.extend(pending);
        tracing::debug!("Saved changes: {}", saved);
        Ok(saved)
    }
}
