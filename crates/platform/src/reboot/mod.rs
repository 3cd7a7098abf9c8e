//! Reboot-state queries

use upkeep_errors::Error;

/// Read-only view of whether the host owes a reboot
pub trait RebootStateSource {
    /// The host's own reboot-required flag
    fn reboot_required(&self) -> Result<bool, Error>;

    /// Number of servicing packages waiting for a reboot to complete
    fn pending_servicing_count(&self) -> Result<usize, Error>;
}
