//! Download priority selection

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host operating system version (major.minor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OsVersion {
    pub major: u32,
    pub minor: u32,
}

impl OsVersion {
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse `major.minor[.build...]`
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.trim().split('.');
        let major = parts.next()?.trim().parse().ok()?;
        let minor = parts.next()?.trim().parse().ok()?;
        Some(Self { major, minor })
    }
}

impl fmt::Display for OsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Priority tier requested from the update service for downloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DownloadPriority {
    Low = 1,
    Normal = 2,
    High = 3,
    ExtraHigh = 4,
}

impl DownloadPriority {
    /// Last OS version that does not know the `ExtraHigh` tier (Windows 7 / 2008 R2)
    pub const EXTRA_HIGH_THRESHOLD: OsVersion = OsVersion::new(6, 1);

    /// Highest tier the host supports
    #[must_use]
    pub fn for_os_version(version: Option<OsVersion>) -> Self {
        match version {
            Some(v) if v > Self::EXTRA_HIGH_THRESHOLD => Self::ExtraHigh,
            _ => Self::High,
        }
    }

    #[must_use]
    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for DownloadPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
            Self::ExtraHigh => "ExtraHigh",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_hosts_get_extra_high() {
        assert_eq!(
            DownloadPriority::for_os_version(Some(OsVersion::new(10, 0))),
            DownloadPriority::ExtraHigh
        );
        assert_eq!(
            DownloadPriority::for_os_version(Some(OsVersion::new(6, 2))),
            DownloadPriority::ExtraHigh
        );
    }

    #[test]
    fn old_or_unknown_hosts_get_high() {
        assert_eq!(
            DownloadPriority::for_os_version(Some(OsVersion::new(6, 1))),
            DownloadPriority::High
        );
        assert_eq!(
            DownloadPriority::for_os_version(Some(OsVersion::new(5, 2))),
            DownloadPriority::High
        );
        assert_eq!(DownloadPriority::for_os_version(None), DownloadPriority::High);
    }

    #[test]
    fn parse_ignores_build_numbers() {
        assert_eq!(OsVersion::parse("10.0.20348"), Some(OsVersion::new(10, 0)));
        assert_eq!(OsVersion::parse("6.1"), Some(OsVersion::new(6, 1)));
        assert_eq!(OsVersion::parse("6"), None);
        assert_eq!(OsVersion::parse("six.one"), None);
    }
}
