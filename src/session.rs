//! Device session manager (§4.6): for one physical keyboard, owns the open descriptor and
//! the per-device [`Processor`] state, and drives its events into a shared [`VirtualOutput`].
//!
//! The logical [`Keyboard`]/`LayerSet` a session drives may be shared with other sessions
//! built from the same named profile — layer activation is a property of the
//! configuration, not of an individual physical device (§4.6, §5).

use crate::error::DeviceError;
use crate::keyboard::Keyboard;
use crate::output::VirtualOutput;
use crate::platform::InputSource;
use crate::processor::Processor;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// One managed physical keyboard: its open input source, the shared logical keyboard it
/// drives, and its own descriptor cache / dispatch state.
pub struct Session<I: InputSource> {
    input: I,
    keyboard: Arc<Keyboard>,
    processor: Processor,
}

impl<I: InputSource> Session<I> {
    pub fn new(mut input: I, keyboard: Arc<Keyboard>) -> Result<Self, DeviceError> {
        let processor = Processor::new(&keyboard);
        input.grab()?;
        Ok(Self { input, keyboard, processor })
    }

    pub fn name(&self) -> &str {
        self.input.name()
    }

    pub fn path(&self) -> &std::path::Path {
        self.input.path()
    }

    pub fn raw_fd(&self) -> std::os::unix::io::RawFd {
        self.input.raw_fd()
    }

    /// Drains whatever events are currently queued and feeds each into the processor.
    pub fn pump(&mut self, out: &mut VirtualOutput) -> Result<(), DeviceError> {
        for event in self.input.drain_events()? {
            self.processor.process_event(&self.keyboard, out, event, now_ms());
        }
        Ok(())
    }

    /// Releases the grab on this device. Called on teardown so the physical keyboard
    /// reverts to direct delivery (§7 "User-visible behavior").
    pub fn close(mut self) -> Result<(), DeviceError> {
        self.input.ungrab()
    }
}

fn now_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}
