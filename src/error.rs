//! Error types for the daemon, grouped by the failure taxonomy of the error-handling
//! design: fatal startup, recoverable per-device, transient I/O, and unknown device.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating on-disk keyboard profiles.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path} as TOML: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("profile {path} defines no layers")]
    EmptyProfile { path: PathBuf },

    #[error("profile {path} references unknown layer {name:?}")]
    UnknownLayer { path: PathBuf, name: String },

    #[error("profile {path} defines layer {name:?} more than once")]
    DuplicateLayer { path: PathBuf, name: String },

    #[error("profile {path}: unrecognized key name {name:?}")]
    UnknownKeyName { path: PathBuf, name: String },

    #[error("profile {path}: malformed descriptor expression {expr:?}: {reason}")]
    BadDescriptor {
        path: PathBuf,
        expr: String,
        reason: String,
    },

    #[error("no configuration directory could be resolved")]
    NoConfigDir,
}

/// Errors raised while opening, grabbing, or reading from a physical input device.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeviceError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to grab {path}: {source}")]
    Grab {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("read error on {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to enumerate /dev/input: {source}")]
    Enumerate {
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the platform layer (virtual device creation, locking).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlatformError {
    #[error("failed to open /dev/uinput: {source}")]
    UinputOpen {
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create virtual {kind} device: {source}")]
    VirtualDeviceCreate {
        kind: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to acquire instance lock at {path}: {reason}")]
    Lock { path: PathBuf, reason: String },

    #[error("failed to install signal handler: {source}")]
    Signal {
        #[source]
        source: std::io::Error,
    },
}

/// Top-level daemon error, aggregating every collaborator's error type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DaemonError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("no keyboard configuration named {0:?} and no default fallback")]
    UnknownDevice(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = DaemonError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_displays_path() {
        let err = ConfigError::EmptyProfile {
            path: PathBuf::from("/etc/keylayerd/default.toml"),
        };
        assert!(err.to_string().contains("default.toml"));
    }

    #[test]
    fn device_error_converts_into_daemon_error() {
        let err: DaemonError = DeviceError::Enumerate {
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
        }
        .into();
        assert!(matches!(err, DaemonError::Device(_)));
    }

    #[test]
    fn platform_error_converts_into_daemon_error() {
        let err: DaemonError = PlatformError::Lock {
            path: PathBuf::from("/run/keylayerd.lock"),
            reason: "already running".into(),
        }
        .into();
        assert!(err.to_string().contains("already running"));
    }

    #[test]
    fn unknown_device_message_includes_name() {
        let err = DaemonError::UnknownDevice("Some Keyboard".into());
        assert!(err.to_string().contains("Some Keyboard"));
    }

    #[test]
    fn errors_are_trait_objects() {
        let err = ConfigError::NoConfigDir;
        let dyn_err: &dyn std::error::Error = &err;
        assert!(dyn_err.source().is_none());
    }
}
