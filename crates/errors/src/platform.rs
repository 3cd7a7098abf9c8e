//! Host collaborator errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Errors raised by the host probes (reboot state, process table, registry).
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    #[error("platform capability not available: {capability}")]
    CapabilityUnavailable { capability: String },

    #[error("registry access failed: {key}: {message}")]
    RegistryAccess { key: String, message: String },

    #[error("COM call failed: {operation} (HRESULT {code:#010x}): {message}")]
    Com {
        operation: String,
        code: u32,
        message: String,
    },

    #[error("process query failed: {message}")]
    ProcessQuery { message: String },

    #[error("filesystem operation failed: {operation} - {message}")]
    FilesystemOperationFailed { operation: String, message: String },
}

impl UserFacingError for PlatformError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::CapabilityUnavailable { .. } => {
                Some("The Windows Update Agent is only available on Windows hosts.")
            }
            Self::RegistryAccess { .. } | Self::Com { .. } => {
                Some("Run upkeep from an elevated (administrator) session.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Com { .. } | Self::ProcessQuery { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::CapabilityUnavailable { .. } => "platform.unavailable",
            Self::RegistryAccess { .. } => "platform.registry",
            Self::Com { .. } => "platform.com",
            Self::ProcessQuery { .. } => "platform.process",
            Self::FilesystemOperationFailed { .. } => "platform.filesystem",
        };
        Some(code)
    }
}
