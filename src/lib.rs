pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::toml_config::TomlConfig;
pub use crate::core::{
    catalog::CatalogService, client::HttpCoverClient, orchestrator::CoverOrchestrator,
    parallel::ParallelJoinStrategy, sequential::SequentialAbortStrategy,
};
pub use utils::error::{CoverError, FetchError, Result};
