//! Windows implementations: Windows Update Agent, registry, tick count

pub mod agent;
pub mod clock;
mod com;
pub mod registry;

pub use agent::WindowsUpdateAgent;
pub use clock::TickCountClock;
pub use registry::{RegistryHostInfo, WindowsRebootState};
