use serde::{Deserialize, Serialize};
use upkeep_types::{ResultCode, UpdateSummary};

/// Install phase events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InstallEvent {
    Started {
        count: usize,
    },

    Completed {
        result_code: ResultCode,
        reboot_required: bool,
    },

    UpdateInstalled {
        update: UpdateSummary,
    },

    /// A single update reported a non-success code inside an otherwise finished install
    UpdateFailed {
        update: UpdateSummary,
        result_code: ResultCode,
    },

    /// Nothing was queued, downloaded or installed in this run
    NothingFound,
}
