use serde::{Deserialize, Serialize};
use std::time::Duration;
use upkeep_types::{DownloadPriority, ResultCode, UpdateSummary};

use super::FailureContext;

/// Download phase events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DownloadEvent {
    Started {
        count: usize,
        total_bytes: u64,
        priority: DownloadPriority,
    },

    /// Download did not succeed and will be retried after `retry_in`
    Failed {
        result_code: ResultCode,
        failure: Option<FailureContext>,
        retry_in: Duration,
    },

    /// Some updates failed to download; the rest continue and a reboot is owed
    PartiallySucceeded { downloaded: usize, requested: usize },

    Completed {
        result_code: ResultCode,
        downloaded: usize,
    },

    /// The update is on disk and queued for install
    UpdateDownloaded { update: UpdateSummary },

    /// The update was queued but is not on disk after the download phase
    UpdateNotDownloaded { update: UpdateSummary },
}
