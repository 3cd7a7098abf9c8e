use std::time::Duration;
use windows::Win32::System::SystemInformation::GetTickCount64;

use crate::clock::Clock;

/// Milliseconds since boot from `GetTickCount64`
#[derive(Debug, Default, Clone, Copy)]
pub struct TickCountClock;

impl Clock for TickCountClock {
    fn uptime(&self) -> Duration {
        Duration::from_millis(unsafe { GetTickCount64() })
    }
}
