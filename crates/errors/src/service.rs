//! Update service (search/download/install) errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum UpdateServiceError {
    #[error("failed to open an update session: {message}")]
    SessionUnavailable { message: String },

    #[error("search failed: {message}")]
    SearchFailed { message: String },

    #[error("failed to accept the license terms of {title}: {message}")]
    EulaFailed { title: String, message: String },

    #[error("download failed: {message}")]
    DownloadFailed { message: String },

    #[error("install failed: {message}")]
    InstallFailed { message: String },

    #[error("update {id} is not part of the current search result")]
    UnknownUpdate { id: String },
}

impl UserFacingError for UpdateServiceError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::SessionUnavailable { .. } => {
                Some("Make sure the Windows Update service (wuauserv) is not disabled.")
            }
            Self::InstallFailed { .. } => {
                Some("Reboot the host and run upkeep again; already downloaded updates are kept.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        !matches!(self, Self::UnknownUpdate { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::SessionUnavailable { .. } => "service.session",
            Self::SearchFailed { .. } => "service.search",
            Self::EulaFailed { .. } => "service.eula",
            Self::DownloadFailed { .. } => "service.download",
            Self::InstallFailed { .. } => "service.install",
            Self::UnknownUpdate { .. } => "service.unknown_update",
        };
        Some(code)
    }
}
