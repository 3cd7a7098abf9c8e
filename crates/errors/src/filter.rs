//! Filter rule parsing errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Errors raised while turning `action:predicate` strings into filter rules.
///
/// `position` fields are byte offsets into the predicate text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("filter rule `{rule}` has no action (expected `include:<predicate>` or `exclude:<predicate>`)")]
    MissingAction { rule: String },

    #[error("filter rule `{rule}` has unknown action `{action}`")]
    UnknownAction { rule: String, action: String },

    #[error("filter rule `{rule}` has an empty predicate")]
    EmptyPredicate { rule: String },

    #[error("unexpected character `{found}` at {position}")]
    UnexpectedChar { found: char, position: usize },

    #[error("unterminated string starting at {position}")]
    UnterminatedString { position: usize },

    #[error("unknown operator `-{operator}` at {position}")]
    UnknownOperator { operator: String, position: usize },

    #[error("unknown variable `${name}` at {position}")]
    UnknownVariable { name: String, position: usize },

    #[error("unknown update property `{property}`")]
    UnknownProperty { property: String },

    #[error("expected {expected} at {position}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: usize,
    },

    #[error("invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("operator `-{operator}` requires a string literal on its right-hand side")]
    PatternNotLiteral { operator: String },

    #[error("invalid filter rule `{rule}`: {source}")]
    InRule {
        rule: String,
        #[source]
        source: Box<FilterError>,
    },
}

impl FilterError {
    /// Attach the full rule text to a predicate error.
    #[must_use]
    pub fn in_rule(self, rule: impl Into<String>) -> Self {
        Self::InRule {
            rule: rule.into(),
            source: Box::new(self),
        }
    }
}

impl UserFacingError for FilterError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingAction { .. } | Self::UnknownAction { .. } => {
                Some("Write rules as `include:<predicate>` or `exclude:<predicate>`, e.g. `exclude:$_.Title -like '*Preview*'`.")
            }
            Self::UnknownProperty { .. } => Some(
                "Supported properties: Title, Identity.UpdateID, KBArticleIDs, Categories, MaxDownloadSize, LastDeploymentChangeTime, InstallationBehavior.CanRequestUserInput, IsDownloaded, IsMandatory.",
            ),
            Self::InRule { source, .. } => source.user_hint(),
            _ => Some("Fix the filter predicate syntax and run upkeep again."),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Self::InRule { source, .. } => source.user_code(),
            Self::UnknownProperty { .. } => Some("filter.unknown_property"),
            Self::MissingAction { .. } | Self::UnknownAction { .. } => Some("filter.action"),
            _ => Some("filter.syntax"),
        }
    }
}
