//! Portable boot clock and host information

use std::time::Duration;
use upkeep_types::OsVersion;

use crate::clock::{Clock, HostInfo};

/// Time since boot from the OS
#[derive(Debug, Default, Clone, Copy)]
pub struct BootClock;

impl Clock for BootClock {
    #[cfg(target_os = "linux")]
    #[allow(unsafe_code)]
    fn uptime(&self) -> Duration {
        let mut ts = libc::timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };
        // SAFETY: `ts` is a valid, writable timespec for the duration of the call.
        let rc = unsafe { libc::clock_gettime(libc::CLOCK_BOOTTIME, &raw mut ts) };
        if rc == 0 {
            Duration::new(
                u64::try_from(ts.tv_sec).unwrap_or(0),
                u32::try_from(ts.tv_nsec).unwrap_or(0),
            )
        } else {
            Duration::from_secs(sysinfo::System::uptime())
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn uptime(&self) -> Duration {
        Duration::from_secs(sysinfo::System::uptime())
    }
}

/// OS version as reported by `sysinfo`
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoHostInfo;

impl HostInfo for SysinfoHostInfo {
    fn os_version(&self) -> Option<OsVersion> {
        sysinfo::System::os_version().and_then(|v| OsVersion::parse(&v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_is_monotonic() {
        let clock = BootClock;
        let first = clock.uptime();
        let second = clock.uptime();
        assert!(second >= first);
        assert!(first > Duration::ZERO);
    }
}
