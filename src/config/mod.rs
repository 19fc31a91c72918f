#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::{ConfigProvider, CoverVariant, StrategyKind};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{
    validate_path_segment, validate_positive_number, validate_url, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_BASE_URL: &str = "http://localhost:52644/api";
pub const DEFAULT_RESOURCE_KIND: &str = "bookcovers";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "book-covers")]
#[command(about = "Fetch book covers from a remote cover service")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: cli::Command,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[arg(long, global = true)]
    pub resource_kind: Option<String>,

    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, value_enum, global = true)]
    pub strategy: Option<StrategyKind>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Lays command-line values over a file configuration.
    pub fn apply_to(&self, config: &mut toml_config::TomlConfig) {
        if let Some(base_url) = &self.base_url {
            config.service.base_url = base_url.clone();
        }
        if let Some(resource_kind) = &self.resource_kind {
            config.service.resource_kind = resource_kind.clone();
        }
        if self.timeout_seconds.is_some() {
            config.service.timeout_seconds = self.timeout_seconds;
        }
        if let Some(strategy) = self.strategy {
            config.fetch.strategy = strategy;
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", self.base_url())?;
        validate_path_segment("resource_kind", self.resource_kind())?;
        if let Some(timeout) = self.timeout_seconds {
            validate_positive_number("timeout_seconds", timeout, 1)?;
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    fn resource_kind(&self) -> &str {
        self.resource_kind.as_deref().unwrap_or(DEFAULT_RESOURCE_KIND)
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn strategy(&self) -> StrategyKind {
        self.strategy.unwrap_or_default()
    }

    fn variants(&self) -> Vec<CoverVariant> {
        CoverVariant::reference_set()
    }
}
