#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for upkeep
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (`<config-dir>/upkeep/config.toml` or `--config`)
//! - Environment variables (`UPKEEP_*`)
//! - CLI flags (applied by the binary)

pub mod constants;
pub mod sections;

pub use sections::{FilterConfig, GeneralConfig, RebootConfig, SearchConfig, TimingConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use upkeep_errors::{ConfigError, Error};
use upkeep_types::ColorChoice;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub reboot: RebootConfig,
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join(constants::APP_DIR).join(constants::CONFIG_FILE))
    }

    /// Directory debug log files are written to
    #[must_use]
    pub fn logs_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(constants::APP_DIR)
            .join(constants::LOGS_DIR)
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::from(ConfigError::NotFound {
                    path: path.display().to_string(),
                })
            } else {
                Error::io_with_path(&e, path)
            }
        })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let Ok(config_path) = Self::default_path() else {
            return Ok(Self::default());
        };

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Merge values produced by `lookup`, keyed by `UPKEEP_*` variable name
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be parsed into the expected type.
    pub fn merge_vars<F>(&mut self, lookup: F) -> Result<(), Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(criteria) = lookup(constants::ENV_SEARCH_CRITERIA) {
            self.search.criteria = criteria;
        }

        // One rule per line; blank lines are ignored
        if let Some(filters) = lookup(constants::ENV_FILTERS) {
            self.filter.rules = filters
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(limit) = lookup(constants::ENV_UPDATE_LIMIT) {
            self.filter.update_limit =
                limit.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    field: constants::ENV_UPDATE_LIMIT.to_string(),
                    value: limit,
                })?;
        }

        if let Some(client_id) = lookup(constants::ENV_CLIENT_ID) {
            self.search.client_application_id = client_id;
        }

        if let Some(color) = lookup(constants::ENV_COLOR) {
            self.general.color =
                color
                    .parse::<ColorChoice>()
                    .map_err(|_| ConfigError::InvalidValue {
                        field: constants::ENV_COLOR.to_string(),
                        value: color,
                    })?;
        }

        Ok(())
    }

    /// Check cross-field constraints after all layers are merged
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), Error> {
        let invalid = |field: &str, value: String| -> Error {
            ConfigError::InvalidValue {
                field: field.to_string(),
                value,
            }
            .into()
        };

        if self.search.criteria.trim().is_empty() {
            return Err(invalid("search.criteria", "\"\"".to_string()));
        }
        if self.filter.rules.is_empty() {
            return Err(invalid("filter.rules", "[]".to_string()));
        }
        if self.filter.update_limit == 0 {
            return Err(invalid("filter.update_limit", "0".to_string()));
        }
        if self.timing.poll_interval_secs == 0 {
            return Err(invalid("timing.poll_interval_secs", "0".to_string()));
        }
        if self.reboot.blocking_process.trim().is_empty() {
            return Err(invalid("reboot.blocking_process", "\"\"".to_string()));
        }
        Ok(())
    }
}
