//! Reboot state from the `reboot-required` marker files

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use upkeep_errors::{Error, PlatformError};

use crate::reboot::RebootStateSource;

/// Reads `/var/run/reboot-required` and `/var/run/reboot-required.pkgs`
#[derive(Debug, Clone)]
pub struct RebootRequiredFile {
    flag: PathBuf,
    packages: PathBuf,
}

impl RebootRequiredFile {
    pub fn new(flag: impl Into<PathBuf>, packages: impl Into<PathBuf>) -> Self {
        Self {
            flag: flag.into(),
            packages: packages.into(),
        }
    }
}

impl Default for RebootRequiredFile {
    fn default() -> Self {
        Self::new(
            "/var/run/reboot-required",
            "/var/run/reboot-required.pkgs",
        )
    }
}

fn read_error(path: &Path, err: &std::io::Error) -> Error {
    PlatformError::FilesystemOperationFailed {
        operation: format!("read {}", path.display()),
        message: err.to_string(),
    }
    .into()
}

impl RebootStateSource for RebootRequiredFile {
    fn reboot_required(&self) -> Result<bool, Error> {
        match std::fs::metadata(&self.flag) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(read_error(&self.flag, &e)),
        }
    }

    fn pending_servicing_count(&self) -> Result<usize, Error> {
        match std::fs::read_to_string(&self.packages) {
            Ok(contents) => Ok(contents.lines().filter(|l| !l.trim().is_empty()).count()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(read_error(&self.packages, &e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_mean_nothing_pending() {
        let dir = tempfile::tempdir().unwrap();
        let source = RebootRequiredFile::new(dir.path().join("flag"), dir.path().join("pkgs"));
        assert!(!source.reboot_required().unwrap());
        assert_eq!(source.pending_servicing_count().unwrap(), 0);
    }

    #[test]
    fn reads_flag_and_package_lines() {
        let dir = tempfile::tempdir().unwrap();
        let flag = dir.path().join("flag");
        let pkgs = dir.path().join("pkgs");
        std::fs::write(&flag, "*** System restart required ***\n").unwrap();
        std::fs::write(&pkgs, "linux-image-6.8.0-45-generic\n\nlibc6\n").unwrap();

        let source = RebootRequiredFile::new(flag, pkgs);
        assert!(source.reboot_required().unwrap());
        assert_eq!(source.pending_servicing_count().unwrap(), 2);
    }
}
