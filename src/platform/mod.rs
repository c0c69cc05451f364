//! Platform abstraction layer (§6): traits the core's device session and daemon loop are
//! driven through, kept separate from the concrete Linux backend in [`linux`] so the
//! session/dispatch code can be exercised without `/dev/input` or `/dev/uinput` access.

pub mod linux;

use crate::error::DeviceError;
use crate::output::RawEvent;
use std::path::{Path, PathBuf};

/// One physical (or, for tests, simulated) input device capable of producing raw events
/// and being exclusively grabbed.
pub trait InputSource {
    fn name(&self) -> &str;
    fn path(&self) -> &Path;
    fn grab(&mut self) -> Result<(), DeviceError>;
    fn ungrab(&mut self) -> Result<(), DeviceError>;

    /// Drains every event currently queued on the device without blocking.
    fn drain_events(&mut self) -> Result<Vec<RawEvent>, DeviceError>;

    /// The raw file descriptor backing this device, for inclusion in a readiness wait.
    fn raw_fd(&self) -> std::os::unix::io::RawFd;
}

/// Added/removed device paths since the previous [`Discovery::poll_changes`] call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeviceChanges {
    pub added: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
}

/// The device-discovery collaborator's contract (§6): a snapshot enumeration plus a polled
/// stream of add/remove notifications, both excluding this daemon's own virtual devices.
pub trait Discovery {
    fn scan(&mut self) -> Result<Vec<PathBuf>, DeviceError>;
    fn poll_changes(&mut self) -> Result<DeviceChanges, DeviceError>;
}
