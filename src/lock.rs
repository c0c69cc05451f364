//! Single-instance lock file (§6 "Persistent state", §6d): an exclusive, non-blocking
//! `flock` on a well-known path, held for the lifetime of the returned guard.

use crate::error::PlatformError;
use nix::fcntl::{flock, FlockArg};
use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

/// Holds the lock for as long as it is alive; dropping it releases the `flock`.
pub struct InstanceLock {
    _file: File,
    path: PathBuf,
}

impl InstanceLock {
    pub fn acquire(path: &Path) -> Result<Self, PlatformError> {
        let file = OpenOptions::new().create(true).write(true).open(path).map_err(|source| PlatformError::Lock {
            path: path.to_path_buf(),
            reason: source.to_string(),
        })?;

        flock(file.as_raw_fd(), FlockArg::LockExclusiveNonblock).map_err(|errno| PlatformError::Lock {
            path: path.to_path_buf(),
            reason: format!("another instance is already running ({errno})"),
        })?;

        Ok(Self { _file: file, path: path.to_path_buf() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Resolves the default lock path: `$XDG_RUNTIME_DIR/keylayerd.lock`, falling back to
/// `/run/keylayerd.lock` for system-wide installs with no runtime dir (e.g. launched by
/// init before a user session exists).
pub fn default_lock_path() -> PathBuf {
    std::env::var_os("XDG_RUNTIME_DIR")
        .map(|dir| PathBuf::from(dir).join("keylayerd.lock"))
        .unwrap_or_else(|| PathBuf::from("/run/keylayerd.lock"))
}
