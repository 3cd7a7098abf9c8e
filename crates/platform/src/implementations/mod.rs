//! Host-specific implementations

pub mod generic;

#[cfg(windows)]
pub mod windows;
