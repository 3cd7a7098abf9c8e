//! Update service operations

use async_trait::async_trait;
use upkeep_errors::Error;
use upkeep_types::{
    DownloadPriority, DownloadResult, InstallResult, SearchResult, Update, UpdateCollection,
};

/// Search, download and install against the host's update service
///
/// Implementations may block the calling thread for the duration of an
/// operation. Failures the service reports through a result code come back
/// as `Ok` with that code; `Err` means the call itself failed.
#[async_trait(?Send)]
pub trait UpdateService {
    /// Fail fast when the host has no update service at all
    ///
    /// Search and download errors are retried without bound, so a missing
    /// service has to be caught before the pipeline starts.
    fn ensure_available(&self) -> Result<(), Error> {
        Ok(())
    }

    /// Open a fresh session and run a search with the given criteria
    async fn search(&self, criteria: &str) -> Result<SearchResult, Error>;

    /// Accept the license terms of an update returned by the last search
    async fn accept_eula(&self, update: &Update) -> Result<(), Error>;

    /// Download `updates` at `priority`
    async fn download(
        &self,
        updates: &UpdateCollection,
        priority: DownloadPriority,
    ) -> Result<DownloadResult, Error>;

    /// Install `updates`, which must already be downloaded
    async fn install(&self, updates: &UpdateCollection) -> Result<InstallResult, Error>;
}
