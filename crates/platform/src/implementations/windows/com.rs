//! COM initialization and error mapping

use upkeep_errors::{Error, PlatformError};
use windows::Win32::Foundation::RPC_E_CHANGED_MODE;
use windows::Win32::System::Com::{CoInitializeEx, COINIT_MULTITHREADED};

/// Initialize COM on the calling thread
///
/// A thread already initialized in another apartment mode is fine: the
/// Windows Update Agent objects are usable from either.
pub(crate) fn initialize() -> Result<(), Error> {
    let hr = unsafe { CoInitializeEx(None, COINIT_MULTITHREADED) };
    if hr.is_ok() || hr == RPC_E_CHANGED_MODE {
        Ok(())
    } else {
        Err(com_error("CoInitializeEx", &windows::core::Error::from(hr)))
    }
}

/// Message plus HRESULT, e.g. `No network connection (HRESULT 0x8024402c)`
pub(crate) fn describe(err: &windows::core::Error) -> String {
    format!("{} (HRESULT {:#010x})", err.message(), err.code().0)
}

pub(crate) fn com_error(operation: &str, err: &windows::core::Error) -> Error {
    PlatformError::Com {
        operation: operation.to_string(),
        code: u32::from_ne_bytes(err.code().0.to_ne_bytes()),
        message: err.message().to_string(),
    }
    .into()
}
