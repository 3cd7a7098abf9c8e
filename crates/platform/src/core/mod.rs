//! Core platform abstraction

use upkeep_errors::Error;

use crate::clock::{Clock, HostInfo};
use crate::process::ProcessProbe;
use crate::reboot::RebootStateSource;
use crate::service::UpdateService;

/// Main platform abstraction providing access to all host collaborators
pub struct Platform {
    update_service: Box<dyn UpdateService>,
    reboot_state: Box<dyn RebootStateSource>,
    process_probe: Box<dyn ProcessProbe>,
    clock: Box<dyn Clock>,
    host_info: Box<dyn HostInfo>,
}

impl Platform {
    /// Create a new platform instance with the specified implementations
    pub fn new(
        update_service: Box<dyn UpdateService>,
        reboot_state: Box<dyn RebootStateSource>,
        process_probe: Box<dyn ProcessProbe>,
        clock: Box<dyn Clock>,
        host_info: Box<dyn HostInfo>,
    ) -> Self {
        Self {
            update_service,
            reboot_state,
            process_probe,
            clock,
            host_info,
        }
    }

    /// Get the platform for the running host
    ///
    /// `client_application_id` is recorded by the update service with every
    /// session the platform opens.
    ///
    /// # Errors
    ///
    /// Returns an error if the host's update service cannot be initialized.
    #[cfg(windows)]
    pub fn current(client_application_id: &str) -> Result<Self, Error> {
        use crate::implementations::generic::SysinfoProcessProbe;
        use crate::implementations::windows::{
            RegistryHostInfo, TickCountClock, WindowsRebootState, WindowsUpdateAgent,
        };

        Ok(Self::new(
            Box::new(WindowsUpdateAgent::new(client_application_id)?),
            Box::new(WindowsRebootState::new()?),
            Box::new(SysinfoProcessProbe::new()),
            Box::new(TickCountClock),
            Box::new(RegistryHostInfo),
        ))
    }

    /// Get the platform for the running host
    ///
    /// The update service is unavailable off Windows; every probe still works.
    ///
    /// # Errors
    ///
    /// Never fails on this host; the signature matches the Windows build.
    #[cfg(not(windows))]
    pub fn current(client_application_id: &str) -> Result<Self, Error> {
        use crate::implementations::generic::{
            BootClock, RebootRequiredFile, SysinfoHostInfo, SysinfoProcessProbe,
            UnsupportedUpdateService,
        };

        tracing::debug!(
            client_application_id,
            "no update service on this host, using portable probes"
        );
        Ok(Self::new(
            Box::new(UnsupportedUpdateService),
            Box::new(RebootRequiredFile::default()),
            Box::new(SysinfoProcessProbe::new()),
            Box::new(BootClock),
            Box::new(SysinfoHostInfo),
        ))
    }

    /// Access the update service
    pub fn updates(&self) -> &dyn UpdateService {
        &*self.update_service
    }

    /// Access the reboot-state source
    pub fn reboot_state(&self) -> &dyn RebootStateSource {
        &*self.reboot_state
    }

    /// Access the process probe
    pub fn process(&self) -> &dyn ProcessProbe {
        &*self.process_probe
    }

    /// Access the boot clock
    pub fn clock(&self) -> &dyn Clock {
        &*self.clock
    }

    /// Access host information
    pub fn host(&self) -> &dyn HostInfo {
        &*self.host_info
    }
}
