pub mod catalog;
pub mod client;
pub mod orchestrator;
pub mod parallel;
pub mod sequential;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{
    Author, Book, BookDto, BookForCreation, BookWithCoversDto, CoverLocator, CoverResource,
    CoverVariant, FetchOutcome, StrategyKind,
};
pub use crate::domain::ports::{BooksRepository, ConfigProvider, CoverSource, FetchStrategy};
pub use crate::utils::error::Result;
