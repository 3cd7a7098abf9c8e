//! Reboot state and host version from the registry and the update agent

use std::io::ErrorKind;
use upkeep_errors::{Error, PlatformError};
use upkeep_types::OsVersion;
use windows::Win32::System::Com::{CoCreateInstance, CLSCTX_INPROC_SERVER};
use windows::Win32::System::UpdateAgent::{ISystemInformation, SystemInformation};
use winreg::enums::HKEY_LOCAL_MACHINE;
use winreg::RegKey;

use super::com;
use crate::clock::HostInfo;
use crate::reboot::RebootStateSource;

const PACKAGES_PENDING_KEY: &str =
    r"SOFTWARE\Microsoft\Windows\CurrentVersion\Component Based Servicing\PackagesPending";

const CURRENT_VERSION_KEY: &str = r"SOFTWARE\Microsoft\Windows NT\CurrentVersion";

/// Update agent reboot flag plus component servicing packages
pub struct WindowsRebootState {
    system_information: ISystemInformation,
}

impl WindowsRebootState {
    /// # Errors
    ///
    /// Returns an error if COM or the `SystemInformation` object cannot be created.
    pub fn new() -> Result<Self, Error> {
        com::initialize()?;
        let system_information: ISystemInformation =
            unsafe { CoCreateInstance(&SystemInformation, None, CLSCTX_INPROC_SERVER) }
                .map_err(|e| com::com_error("create SystemInformation", &e))?;
        Ok(Self { system_information })
    }
}

impl RebootStateSource for WindowsRebootState {
    fn reboot_required(&self) -> Result<bool, Error> {
        unsafe { self.system_information.RebootRequired() }
            .map(|flag| flag.as_bool())
            .map_err(|e| com::com_error("SystemInformation.RebootRequired", &e))
    }

    fn pending_servicing_count(&self) -> Result<usize, Error> {
        let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
        match hklm.open_subkey(PACKAGES_PENDING_KEY) {
            Ok(key) => Ok(key.enum_keys().filter_map(Result::ok).count()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(PlatformError::RegistryAccess {
                key: format!(r"HKLM\{PACKAGES_PENDING_KEY}"),
                message: e.to_string(),
            }
            .into()),
        }
    }
}

/// OS version from `HKLM\...\Windows NT\CurrentVersion`
#[derive(Debug, Default, Clone, Copy)]
pub struct RegistryHostInfo;

impl HostInfo for RegistryHostInfo {
    fn os_version(&self) -> Option<OsVersion> {
        let key = RegKey::predef(HKEY_LOCAL_MACHINE)
            .open_subkey(CURRENT_VERSION_KEY)
            .ok()?;

        // Windows 10 and later freeze CurrentVersion at 6.3
        let major = key.get_value::<u32, _>("CurrentMajorVersionNumber");
        let minor = key.get_value::<u32, _>("CurrentMinorVersionNumber");
        if let (Ok(major), Ok(minor)) = (major, minor) {
            return Some(OsVersion::new(major, minor));
        }

        key.get_value::<String, _>("CurrentVersion")
            .ok()
            .and_then(|v| OsVersion::parse(&v))
    }
}
