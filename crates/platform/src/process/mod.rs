//! Process table queries

use upkeep_errors::Error;

/// Trait for looking up running processes
pub trait ProcessProbe {
    /// Whether a process with this name is running
    ///
    /// Names match case-insensitively, with or without an `.exe` suffix.
    fn is_running(&self, name: &str) -> Result<bool, Error>;
}

/// Compare a process table entry against a configured name
#[must_use]
pub fn name_matches(process_name: &str, wanted: &str) -> bool {
    fn stem(name: &str) -> &str {
        let name = name.trim();
        match name.len().checked_sub(4) {
            Some(cut) if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(".exe") => {
                &name[..cut]
            }
            _ => name,
        }
    }
    stem(process_name).eq_ignore_ascii_case(stem(wanted))
}
