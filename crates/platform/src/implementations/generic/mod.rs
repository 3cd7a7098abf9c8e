//! Portable implementations

pub mod clock;
pub mod process;
pub mod reboot;
pub mod service;

pub use clock::{BootClock, SysinfoHostInfo};
pub use process::SysinfoProcessProbe;
pub use reboot::RebootRequiredFile;
pub use service::UnsupportedUpdateService;
