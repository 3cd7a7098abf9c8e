//! Phase results returned by the update service

use crate::update::UpdateId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::UpdateCollection;

/// Outcome shared by search, download and install operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultCode {
    NotStarted,
    InProgress,
    Succeeded,
    SucceededWithErrors,
    Failed,
    Aborted,
}

impl ResultCode {
    /// Map the service's numeric operation result code
    #[must_use]
    pub fn from_raw(raw: i32) -> Option<Self> {
        Some(match raw {
            0 => Self::NotStarted,
            1 => Self::InProgress,
            2 => Self::Succeeded,
            3 => Self::SucceededWithErrors,
            4 => Self::Failed,
            5 => Self::Aborted,
            _ => return None,
        })
    }

    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Succeeded | Self::SucceededWithErrors)
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "NotStarted",
            Self::InProgress => "InProgress",
            Self::Succeeded => "Succeeded",
            Self::SucceededWithErrors => "SucceededWithErrors",
            Self::Failed => "Failed",
            Self::Aborted => "Aborted",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub result_code: ResultCode,
    pub updates: UpdateCollection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    pub result_code: ResultCode,
    /// Updates whose payload is on disk once the download returned
    pub downloaded: BTreeSet<UpdateId>,
}

impl DownloadResult {
    #[must_use]
    pub fn is_downloaded(&self, id: &UpdateId) -> bool {
        self.downloaded.contains(id)
    }
}

/// Per-update outcome of an install
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResult {
    pub id: UpdateId,
    pub result_code: ResultCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallResult {
    pub result_code: ResultCode,
    pub reboot_required: bool,
    pub update_results: Vec<UpdateResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_codes_follow_service_enumeration() {
        assert_eq!(ResultCode::from_raw(2), Some(ResultCode::Succeeded));
        assert_eq!(ResultCode::from_raw(3), Some(ResultCode::SucceededWithErrors));
        assert_eq!(ResultCode::from_raw(5), Some(ResultCode::Aborted));
        assert_eq!(ResultCode::from_raw(6), None);
        assert_eq!(ResultCode::from_raw(-1), None);
    }

    #[test]
    fn partial_success_counts_as_success() {
        assert!(ResultCode::SucceededWithErrors.is_success());
        assert!(!ResultCode::Aborted.is_success());
        assert_eq!(ResultCode::SucceededWithErrors.to_string(), "SucceededWithErrors");
    }
}
