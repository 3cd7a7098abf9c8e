use serde::{Deserialize, Serialize};
use std::time::Duration;
use upkeep_types::RebootReason;

/// Reboot-pending detection events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RebootEvent {
    Required {
        reason: RebootReason,
    },

    /// Waiting until `process` has been absent for `debounce`
    WaitingForProcess {
        process: String,
        debounce: Duration,
    },

    ProcessSettled {
        process: String,
        waited: Duration,
    },

    NotRequired,
}
