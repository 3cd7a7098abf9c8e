//! Boot clock and host information

use std::time::Duration;
use upkeep_types::OsVersion;

/// Monotonic time since boot, unaffected by wall-clock changes
pub trait Clock {
    fn uptime(&self) -> Duration;
}

/// Static facts about the host
pub trait HostInfo {
    /// Operating system version, when it can be determined
    fn os_version(&self) -> Option<OsVersion>;
}
