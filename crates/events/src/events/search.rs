use serde::{Deserialize, Serialize};
use std::time::Duration;
use upkeep_types::ResultCode;

use super::FailureContext;

/// Update search events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SearchEvent {
    Started {
        criteria: String,
        attempt: u32,
    },

    /// The search did not succeed and will be retried after `retry_in`.
    ///
    /// `failure` is set when the service raised an error instead of
    /// returning a result code.
    Failed {
        result_code: ResultCode,
        failure: Option<FailureContext>,
        retry_in: Duration,
    },

    Completed {
        found: usize,
        attempts: u32,
    },
}
