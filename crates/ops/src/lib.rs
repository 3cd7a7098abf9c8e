#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Update pipeline orchestration for upkeep
//!
//! This crate sits between the CLI and the host collaborators. It owns the
//! control loop (search, select, download, install), the reboot-pending
//! decision and the debounced wait for the blocking installer process.

mod context;
mod debounce;
mod reboot;
mod types;
mod update;

pub use context::{OpsContextBuilder, OpsCtx};
pub use debounce::wait_until_stable;
pub use reboot::check_reboot_required;
pub use types::RunState;
pub use update::{check_reboot_only, run};
