//! Process probe backed by `sysinfo`

use std::sync::Mutex;
use sysinfo::{ProcessesToUpdate, System};
use upkeep_errors::{Error, PlatformError};

use crate::process::{name_matches, ProcessProbe};

/// Scans the process table on every query
pub struct SysinfoProcessProbe {
    system: Mutex<System>,
}

impl SysinfoProcessProbe {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for SysinfoProcessProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessProbe for SysinfoProcessProbe {
    fn is_running(&self, name: &str) -> Result<bool, Error> {
        let mut system = self
            .system
            .lock()
            .map_err(|_| PlatformError::ProcessQuery {
                message: "process table lock poisoned".to_string(),
            })?;
        system.refresh_processes(ProcessesToUpdate::All, true);

        let running = system
            .processes()
            .values()
            .any(|process| name_matches(&process.name().to_string_lossy(), name));
        Ok(running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_own_process_and_not_a_made_up_one() {
        let probe = SysinfoProcessProbe::new();
        let exe = std::env::current_exe().unwrap();
        let own = exe.file_name().unwrap().to_string_lossy().into_owned();

        // the kernel may report the name truncated to 15 chars
        let visible: String = own.chars().take(15).collect();
        assert!(probe.is_running(&own).unwrap() || probe.is_running(&visible).unwrap());
        assert!(!probe.is_running("upkeep-no-such-process-7f3a").unwrap());
    }
}
