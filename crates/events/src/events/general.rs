use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Warnings and operation lifecycle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeneralEvent {
    /// Non-fatal problem the run continues past
    Warning {
        message: String,
        context: Option<String>,
    },

    OperationStarted { operation: String },

    OperationCompleted { operation: String, success: bool },

    /// The operation stopped on a fatal error
    OperationFailed {
        operation: String,
        failure: FailureContext,
    },
}

impl GeneralEvent {
    /// Create a warning event with context
    pub fn warning_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
            context: Some(context.into()),
        }
    }
}
