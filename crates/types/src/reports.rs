//! Report type definitions for a single run

use crate::ResultCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Why the host owes a reboot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RebootReason {
    /// The install result asked for a reboot
    InstallResult,
    /// The run deferred work to the next boot (update limit, partial download)
    DeferredWork,
    /// The update service's own reboot-required flag is set
    SystemFlag,
    /// Component servicing has packages pending
    PendingServicing { count: usize },
}

impl fmt::Display for RebootReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstallResult => f.write_str("installed updates require a reboot"),
            Self::DeferredWork => f.write_str("remaining updates are deferred to the next run"),
            Self::SystemFlag => f.write_str("the system reports a pending reboot"),
            Self::PendingServicing { count } => {
                write!(f, "{count} servicing package(s) are pending")
            }
        }
    }
}

/// How the run ended, and the exit code the caller receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Completed,
    RebootRequired,
}

impl RunOutcome {
    /// Exit code telling the caller to reboot and run again
    pub const REBOOT_EXIT_CODE: u8 = 101;

    #[must_use]
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Completed => 0,
            Self::RebootRequired => Self::REBOOT_EXIT_CODE,
        }
    }
}

/// Summary of one invocation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub outcome: RunOutcome,
    pub reboot_reason: Option<RebootReason>,
    /// Updates returned by the search
    pub found: Vec<String>,
    /// Updates dropped by the filter rules
    pub skipped: Vec<String>,
    /// Updates queued for download
    pub queued: Vec<String>,
    /// Queued updates that are on disk after the download phase
    pub downloaded: Vec<String>,
    pub not_downloaded: Vec<String>,
    pub installed: Vec<String>,
    /// Sum of the queued updates' maximum download sizes, in bytes
    pub total_download_size: u64,
    pub download_result: Option<ResultCode>,
    pub install_result: Option<ResultCode>,
    /// Total execution time
    pub duration_ms: u64,
}

impl RunReport {
    #[must_use]
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            outcome: RunOutcome::Completed,
            reboot_reason: None,
            found: Vec::new(),
            skipped: Vec::new(),
            queued: Vec::new(),
            downloaded: Vec::new(),
            not_downloaded: Vec::new(),
            installed: Vec::new(),
            total_download_size: 0,
            download_result: None,
            install_result: None,
            duration_ms: 0,
        }
    }
}
