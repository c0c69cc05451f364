//! Linux device-discovery collaborator (§6b): scans `/dev/input/event*` directly and
//! polls for hotplug changes by diffing successive scans. No `udev`/`inotify` crate
//! appears anywhere in the corpus this daemon is grounded on, so this deliberately
//! approximates hotplug rather than subscribing to a true kernel event channel.

use crate::error::DeviceError;
use crate::platform::{DeviceChanges, Discovery};
use evdev::Device;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::input_capture::looks_like_keyboard;
use super::output_injection::{VIRTUAL_KEYBOARD_NAME, VIRTUAL_POINTER_NAME};

const INPUT_DIR: &str = "/dev/input";

pub struct LinuxDiscovery {
    seen: BTreeSet<PathBuf>,
}

impl LinuxDiscovery {
    pub fn new() -> Self {
        Self { seen: BTreeSet::new() }
    }

    fn scan_paths(&self) -> Result<Vec<PathBuf>, DeviceError> {
        let entries = fs::read_dir(INPUT_DIR).map_err(|source| DeviceError::Enumerate { source })?;

        let mut keyboards = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| DeviceError::Enumerate { source })?;
            let path = entry.path();
            if !is_candidate_name(&path) {
                continue;
            }
            let Ok(device) = Device::open(&path) else { continue };
            if !looks_like_keyboard(&device) {
                continue;
            }
            if is_our_virtual_device(&device) {
                continue;
            }
            keyboards.push(path);
        }
        keyboards.sort();
        Ok(keyboards)
    }
}

impl Default for LinuxDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

impl Discovery for LinuxDiscovery {
    fn scan(&mut self) -> Result<Vec<PathBuf>, DeviceError> {
        let found = self.scan_paths()?;
        self.seen = found.iter().cloned().collect();
        Ok(found)
    }

    fn poll_changes(&mut self) -> Result<DeviceChanges, DeviceError> {
        let found: BTreeSet<PathBuf> = self.scan_paths()?.into_iter().collect();

        let added = found.difference(&self.seen).cloned().collect();
        let removed = self.seen.difference(&found).cloned().collect();
        self.seen = found;

        Ok(DeviceChanges { added, removed })
    }
}

fn is_candidate_name(path: &Path) -> bool {
    path.file_name().and_then(|n| n.to_str()).map(|n| n.starts_with("event")).unwrap_or(false)
}

fn is_our_virtual_device(device: &Device) -> bool {
    matches!(device.name(), Some(VIRTUAL_KEYBOARD_NAME) | Some(VIRTUAL_POINTER_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_event_nodes() {
        assert!(!is_candidate_name(Path::new("/dev/input/mice")));
        assert!(is_candidate_name(Path::new("/dev/input/event3")));
    }
}
