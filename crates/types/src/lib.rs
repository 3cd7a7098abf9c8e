#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for upkeep
//!
//! This crate provides the data model shared by the update pipeline:
//! update records, ordered update collections, phase results with their
//! shared result code, download priority and run reports.

pub mod priority;
pub mod reports;
pub mod result;
pub mod update;

// Re-export commonly used types
pub use priority::{DownloadPriority, OsVersion};
pub use reports::{RebootReason, RunOutcome, RunReport};
pub use result::{DownloadResult, InstallResult, ResultCode, SearchResult, UpdateResult};
pub use update::{InstallationBehavior, Update, UpdateCollection, UpdateId, UpdateSummary};
pub use uuid::Uuid;

use serde::{Deserialize, Serialize};

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Always,
    #[default]
    Auto,
    Never,
}

impl clap::ValueEnum for ColorChoice {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Always, Self::Auto, Self::Never]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Always => clap::builder::PossibleValue::new("always"),
            Self::Auto => clap::builder::PossibleValue::new("auto"),
            Self::Never => clap::builder::PossibleValue::new("never"),
        })
    }
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "auto" => Ok(Self::Auto),
            "never" => Ok(Self::Never),
            other => Err(format!("unknown color choice `{other}`")),
        }
    }
}
