use serde::{Deserialize, Serialize};
use std::time::Duration;
use upkeep_types::UpdateSummary;

/// Filtering and queueing of search results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SelectionEvent {
    /// The filter rules accepted the update and it was queued for download
    Included {
        update: UpdateSummary,
        rule: Option<usize>,
    },

    /// The filter rules rejected the update; `rule` is the matching rule index
    Skipped {
        update: UpdateSummary,
        rule: Option<usize>,
    },

    /// The update may block on user input while installing
    UserInputWarning { update: UpdateSummary },

    /// The download queue is full; remaining candidates wait for the next run
    LimitReached { limit: usize, remaining: usize },

    /// Fixed pause between search and download
    Paused { duration: Duration },
}
