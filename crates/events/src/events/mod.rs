use serde::{Deserialize, Serialize};

use upkeep_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureContext {
    /// Stable error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    /// Construct a new failure context.
    #[must_use]
    pub fn new(
        code: Option<impl Into<String>>,
        message: impl Into<String>,
        hint: Option<impl Into<String>>,
        retryable: bool,
    ) -> Self {
        Self {
            code: code.map(Into::into),
            message: message.into(),
            hint: hint.map(Into::into),
            retryable,
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(
            error.user_code(),
            error.user_message().into_owned(),
            error.user_hint(),
            error.is_retryable(),
        )
    }
}

pub mod download;
pub mod general;
pub mod install;
pub mod reboot;
pub mod search;
pub mod selection;

pub use download::*;
pub use general::*;
pub use install::*;
pub use reboot::*;
pub use search::*;
pub use selection::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, errors, operations)
    General(GeneralEvent),

    /// Searching the update service
    Search(SearchEvent),

    /// Filtering and queueing search results
    Selection(SelectionEvent),

    /// Downloading queued updates
    Download(DownloadEvent),

    /// Installing downloaded updates
    Install(InstallEvent),

    /// Reboot-pending detection
    Reboot(RebootEvent),
}

impl AppEvent {
    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::General(GeneralEvent::OperationFailed { .. }) => Level::ERROR,

            Self::General(GeneralEvent::Warning { .. })
            | Self::Search(SearchEvent::Failed { .. })
            | Self::Selection(
                SelectionEvent::UserInputWarning { .. } | SelectionEvent::LimitReached { .. },
            )
            | Self::Download(
                DownloadEvent::Failed { .. }
                | DownloadEvent::PartiallySucceeded { .. }
                | DownloadEvent::UpdateNotDownloaded { .. },
            )
            | Self::Install(InstallEvent::UpdateFailed { .. }) => Level::WARN,

            Self::Reboot(RebootEvent::NotRequired) => Level::DEBUG,

            _ => Level::INFO,
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "upkeep::events::general",
            Self::Search(_) => "upkeep::events::search",
            Self::Selection(_) => "upkeep::events::selection",
            Self::Download(_) => "upkeep::events::download",
            Self::Install(_) => "upkeep::events::install",
            Self::Reboot(_) => "upkeep::events::reboot",
        }
    }
}
