//! Types threaded through one run

use upkeep_types::UpdateCollection;

/// Mutable state of one pipeline run
///
/// Lives for a single invocation; nothing here is persisted. Progress across
/// runs is kept by the update service itself.
#[derive(Debug, Default)]
pub struct RunState {
    /// Work was left for the next boot (limit reached, partial download)
    pub reboot_required: bool,
    /// Sum of the queued updates' maximum download sizes
    pub total_download_size: u64,
    /// Accepted by the filter, in search order
    pub to_download: UpdateCollection,
    /// Subset of `to_download` that is on disk after the download phase
    pub to_install: UpdateCollection,
}

impl RunState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
