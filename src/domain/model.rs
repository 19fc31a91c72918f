use crate::utils::error::FetchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A cover as served by the remote cover service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoverResource {
    pub id: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// Address of one cover on the remote service, relative to the resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoverLocator {
    key: String,
    query: Option<String>,
}

impl CoverLocator {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            query: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

impl fmt::Display for CoverLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.query {
            Some(query) => write!(f, "{}?{}", self.key, query),
            None => f.write_str(&self.key),
        }
    }
}

/// One suffix variant appended to a book id to build a locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverVariant {
    pub suffix: String,
    /// Asks the remote service to answer with a fault.
    #[serde(default)]
    pub return_fault: bool,
}

impl CoverVariant {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            return_fault: false,
        }
    }

    pub fn faulting(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            return_fault: true,
        }
    }

    pub fn locator_for(&self, book_id: &Uuid) -> CoverLocator {
        let locator = CoverLocator::new(format!("{}-{}", book_id, self.suffix));
        if self.return_fault {
            locator.with_query("returnFault=true")
        } else {
            locator
        }
    }

    /// The five variants of the reference deployment; the second one faults.
    pub fn reference_set() -> Vec<CoverVariant> {
        vec![
            CoverVariant::new("dummycover1"),
            CoverVariant::faulting("dummycover2"),
            CoverVariant::new("dummycover3"),
            CoverVariant::new("dummycover4"),
            CoverVariant::new("dummycover5"),
        ]
    }
}

/// Classification of a single cover request.
#[derive(Debug)]
pub enum FetchOutcome {
    Success(CoverResource),
    /// Status of the response: either non-success, or success with a `null` body.
    Absent(u16),
    Failed(FetchError),
    Cancelled,
}

impl FetchOutcome {
    pub fn into_cover(self) -> Option<CoverResource> {
        match self {
            FetchOutcome::Success(cover) => Some(cover),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum StrategyKind {
    #[default]
    Sequential,
    Parallel,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Sequential => f.write_str("sequential"),
            StrategyKind::Parallel => f.write_str("parallel"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author: Option<Author>,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookForCreation {
    pub author_id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

impl BookForCreation {
    pub fn into_book(self) -> Book {
        Book {
            id: Uuid::new_v4(),
            author_id: self.author_id,
            author: None,
            title: self.title,
            description: self.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: Uuid,
    pub author: String,
    pub title: String,
    pub description: Option<String>,
}

impl From<&Book> for BookDto {
    fn from(book: &Book) -> Self {
        let author = book
            .author
            .as_ref()
            .map(|a| format!("{} {}", a.first_name, a.last_name))
            .unwrap_or_default();

        Self {
            id: book.id,
            author,
            title: book.title.clone(),
            description: book.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookWithCoversDto {
    #[serde(flatten)]
    pub book: BookDto,
    pub book_covers: Vec<CoverResource>,
}

impl BookWithCoversDto {
    pub fn new(book: &Book, book_covers: Vec<CoverResource>) -> Self {
        Self {
            book: BookDto::from(book),
            book_covers,
        }
    }
}
