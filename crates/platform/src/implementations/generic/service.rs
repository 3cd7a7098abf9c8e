//! Update service stand-in for hosts without one

use async_trait::async_trait;
use upkeep_errors::{Error, PlatformError};
use upkeep_types::{
    DownloadPriority, DownloadResult, InstallResult, SearchResult, Update, UpdateCollection,
};

use crate::service::UpdateService;

/// Reports every operation as unavailable
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedUpdateService;

impl UnsupportedUpdateService {
    fn unavailable() -> Error {
        PlatformError::CapabilityUnavailable {
            capability: "Windows Update Agent".to_string(),
        }
        .into()
    }
}

#[async_trait(?Send)]
impl UpdateService for UnsupportedUpdateService {
    fn ensure_available(&self) -> Result<(), Error> {
        Err(Self::unavailable())
    }

    async fn search(&self, _criteria: &str) -> Result<SearchResult, Error> {
        Err(Self::unavailable())
    }

    async fn accept_eula(&self, _update: &Update) -> Result<(), Error> {
        Err(Self::unavailable())
    }

    async fn download(
        &self,
        _updates: &UpdateCollection,
        _priority: DownloadPriority,
    ) -> Result<DownloadResult, Error> {
        Err(Self::unavailable())
    }

    async fn install(&self, _updates: &UpdateCollection) -> Result<InstallResult, Error> {
        Err(Self::unavailable())
    }
}
