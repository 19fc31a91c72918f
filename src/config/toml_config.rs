use crate::config::{DEFAULT_BASE_URL, DEFAULT_RESOURCE_KIND};
use crate::core::{ConfigProvider, CoverVariant, StrategyKind};
use crate::utils::error::{CoverError, Result};
use crate::utils::validation::{
    validate_path_segment, validate_positive_number, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_resource_kind")]
    pub resource_kind: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            resource_kind: default_resource_kind(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default)]
    pub strategy: StrategyKind,
    /// Falls back to the reference variants when unset.
    pub variants: Option<Vec<CoverVariant>>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_resource_kind() -> String {
    DEFAULT_RESOURCE_KIND.to_string()
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CoverError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CoverError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CoverError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("service.base_url", &self.service.base_url)?;
        validate_path_segment("service.resource_kind", &self.service.resource_kind)?;

        if let Some(timeout) = self.service.timeout_seconds {
            validate_positive_number("service.timeout_seconds", timeout, 1)?;
        }

        if let Some(variants) = &self.fetch.variants {
            if variants.is_empty() {
                return Err(CoverError::InvalidConfigValueError {
                    field: "fetch.variants".to_string(),
                    value: "[]".to_string(),
                    reason: "At least one variant is required".to_string(),
                });
            }
            for variant in variants {
                validate_path_segment("fetch.variants.suffix", &variant.suffix)?;
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        &self.service.base_url
    }

    fn resource_kind(&self) -> &str {
        &self.service.resource_kind
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.service.timeout_seconds
    }

    fn strategy(&self) -> StrategyKind {
        self.fetch.strategy
    }

    fn variants(&self) -> Vec<CoverVariant> {
        self.fetch
            .variants
            .clone()
            .unwrap_or_else(CoverVariant::reference_set)
    }
}
