//! Configuration sections

use crate::constants;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use upkeep_types::ColorChoice;

/// General application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default)]
    pub color: ColorChoice,
}

/// How the update service is queried
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_criteria")]
    pub criteria: String,
    #[serde(default = "default_client_application_id")]
    pub client_application_id: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            criteria: default_criteria(),
            client_application_id: default_client_application_id(),
        }
    }
}

/// Which search results are queued
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Ordered `action:predicate` rules; the first matching rule decides
    #[serde(default = "default_rules")]
    pub rules: Vec<String>,
    /// Maximum number of updates queued in one run
    #[serde(default = "default_update_limit")]
    pub update_limit: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            update_limit: default_update_limit(),
        }
    }
}

/// Delays and polling intervals, in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,
    #[serde(default = "default_download_pause")]
    pub download_pause_secs: u64,
    #[serde(default = "default_reboot_debounce")]
    pub reboot_debounce_secs: u64,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl TimingConfig {
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    #[must_use]
    pub fn download_pause(&self) -> Duration {
        Duration::from_secs(self.download_pause_secs)
    }

    #[must_use]
    pub fn reboot_debounce(&self) -> Duration {
        Duration::from_secs(self.reboot_debounce_secs)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            retry_delay_secs: default_retry_delay(),
            download_pause_secs: default_download_pause(),
            reboot_debounce_secs: default_reboot_debounce(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

/// Reboot detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebootConfig {
    /// Process that must stay absent for the debounce window before exiting for a reboot
    #[serde(default = "default_blocking_process")]
    pub blocking_process: String,
}

impl Default for RebootConfig {
    fn default() -> Self {
        Self {
            blocking_process: default_blocking_process(),
        }
    }
}

// Default value functions for serde
fn default_criteria() -> String {
    constants::DEFAULT_SEARCH_CRITERIA.to_string()
}

fn default_client_application_id() -> String {
    constants::DEFAULT_CLIENT_APPLICATION_ID.to_string()
}

fn default_rules() -> Vec<String> {
    vec![constants::DEFAULT_FILTER_RULE.to_string()]
}

fn default_update_limit() -> usize {
    constants::DEFAULT_UPDATE_LIMIT
}

fn default_retry_delay() -> u64 {
    constants::DEFAULT_RETRY_DELAY_SECS
}

fn default_download_pause() -> u64 {
    constants::DEFAULT_DOWNLOAD_PAUSE_SECS
}

fn default_reboot_debounce() -> u64 {
    constants::DEFAULT_REBOOT_DEBOUNCE_SECS
}

fn default_poll_interval() -> u64 {
    constants::DEFAULT_POLL_INTERVAL_SECS
}

fn default_blocking_process() -> String {
    constants::DEFAULT_BLOCKING_PROCESS.to_string()
}
