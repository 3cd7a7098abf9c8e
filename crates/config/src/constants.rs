//! Built-in defaults for every configuration value

/// Windows Update Agent search criteria: everything not yet installed that is not optional
pub const DEFAULT_SEARCH_CRITERIA: &str = "BrowseOnly=0 and IsInstalled=0";

/// Client identifier the update service records for telemetry
pub const DEFAULT_CLIENT_APPLICATION_ID: &str = "upkeep";

/// Include every update unless configured otherwise
pub const DEFAULT_FILTER_RULE: &str = "include:$true";

pub const DEFAULT_UPDATE_LIMIT: usize = 1000;

pub const DEFAULT_RETRY_DELAY_SECS: u64 = 5;

/// Pause between search and download; older hosts fail downloads requested right after a search
pub const DEFAULT_DOWNLOAD_PAUSE_SECS: u64 = 30;

pub const DEFAULT_REBOOT_DEBOUNCE_SECS: u64 = 15;

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 1;

/// Servicing worker that keeps running after an install until the host settles
pub const DEFAULT_BLOCKING_PROCESS: &str = "TiWorker";

pub const APP_DIR: &str = "upkeep";
pub const CONFIG_FILE: &str = "config.toml";
pub const LOGS_DIR: &str = "logs";

pub const ENV_SEARCH_CRITERIA: &str = "UPKEEP_SEARCH_CRITERIA";
pub const ENV_FILTERS: &str = "UPKEEP_FILTERS";
pub const ENV_UPDATE_LIMIT: &str = "UPKEEP_UPDATE_LIMIT";
pub const ENV_CLIENT_ID: &str = "UPKEEP_CLIENT_ID";
pub const ENV_COLOR: &str = "UPKEEP_COLOR";
