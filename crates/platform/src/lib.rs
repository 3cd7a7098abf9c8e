//! Host abstraction layer for the update pipeline.
//!
//! This crate provides a unified interface over the collaborators the
//! pipeline drives but does not implement:
//! - the update service (search, license acceptance, download, install)
//! - the reboot-state source (native flag and pending servicing packages)
//! - the installer process probe
//! - the boot clock and host version information
//!
//! On Windows these are backed by the Windows Update Agent COM API and the
//! registry. Elsewhere the update service reports itself unavailable and the
//! remaining probes use portable equivalents.

pub mod clock;
pub mod core;
pub mod implementations;
pub mod process;
pub mod reboot;
pub mod service;

pub use self::core::Platform;

/// Re-export commonly used types
pub use clock::{Clock, HostInfo};
pub use process::ProcessProbe;
pub use reboot::RebootStateSource;
pub use service::UpdateService;
