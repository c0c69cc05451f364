//! The main cooperative loop (§4.6, §5): multiplexes every grabbed device's descriptor
//! plus a periodic discovery poll through a single `poll(2)` wait, feeding ready devices
//! into their session and reacting to hotplug add/remove notifications.
//!
//! The teacher's own `daemon::event_loop` drives a single `Box<dyn Platform>` with one
//! blocking capture call per iteration; that shape doesn't fit a daemon that must watch an
//! unbounded number of physical keyboards at once, so this loop is restructured around
//! `nix::poll` over every session's descriptor instead. Everything else — the
//! `AtomicBool` shutdown flag set from `signal-hook`, the `SIGHUP`-reserved-but-unwired
//! posture — follows the teacher's `daemon::signals` module directly.

use crate::config::{select_profile, Profile};
use crate::error::{DaemonError, DeviceError};
use crate::keyboard::Keyboard;
use crate::output::VirtualOutput;
use crate::platform::linux::input_capture::await_neutrality;
use crate::platform::linux::{EvdevInput, LinuxDiscovery};
use crate::platform::{Discovery, InputSource};
use crate::session::Session;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use signal_hook::consts::{SIGINT, SIGTERM};
use std::collections::HashMap;
use std::os::fd::BorrowedFd;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const POLL_TIMEOUT: Duration = Duration::from_millis(250);
const NEUTRALITY_POLL: Duration = Duration::from_millis(300);

pub struct Daemon {
    discovery: LinuxDiscovery,
    profiles: Vec<Profile>,
    sessions: Vec<Session<EvdevInput>>,
    keyboards: HashMap<String, Arc<Keyboard>>,
    output: VirtualOutput,
    running: Arc<AtomicBool>,
}

impl Daemon {
    pub fn new(profiles: Vec<Profile>, output: VirtualOutput) -> Result<Self, DaemonError> {
        let running = Arc::new(AtomicBool::new(true));
        signal_hook::flag::register(SIGTERM, running.clone()).map_err(|source| crate::error::PlatformError::Signal { source })?;
        signal_hook::flag::register(SIGINT, running.clone()).map_err(|source| crate::error::PlatformError::Signal { source })?;

        Ok(Self {
            discovery: LinuxDiscovery::new(),
            profiles,
            sessions: Vec::new(),
            keyboards: HashMap::new(),
            output,
            running,
        })
    }

    /// Runs until a shutdown signal is observed, then ungrabs and drops every session.
    pub fn run(mut self) -> Result<(), DaemonError> {
        for path in self.discovery.scan()? {
            self.try_attach(path);
        }

        while self.running.load(Ordering::SeqCst) {
            self.pump_ready_sessions()?;

            let changes = self.discovery.poll_changes()?;
            for path in changes.added {
                self.try_attach(path);
            }
            for path in changes.removed {
                self.detach(&path);
            }
        }

        for session in self.sessions.drain(..) {
            let _ = session.close();
        }
        Ok(())
    }

    fn try_attach(&mut self, path: PathBuf) {
        let mut input = match EvdevInput::open(&path) {
            Ok(input) => input,
            Err(err) => {
                log::warn!("skipping {}: {err}", path.display());
                return;
            }
        };

        let Some(profile) = select_profile(&self.profiles, input.name()) else {
            log::warn!("no configuration for device {:?} ({}); ignoring", input.name(), path.display());
            return;
        };

        if let Err(err) = await_neutrality(std::slice::from_mut(&mut input), NEUTRALITY_POLL) {
            log::warn!("neutrality wait failed for {}: {err}", path.display());
            return;
        }

        let keyboard = self
            .keyboards
            .entry(profile.device_name.clone())
            .or_insert_with(|| Arc::new(profile.keyboard.new_keyboard()))
            .clone();

        match Session::new(input, keyboard) {
            Ok(session) => {
                log::info!("managing {} ({})", session.name(), session.path().display());
                self.sessions.push(session);
            }
            Err(err) => log::warn!("failed to grab {}: {err}", path.display()),
        }
    }

    fn detach(&mut self, path: &std::path::Path) {
        if let Some(index) = self.sessions.iter().position(|s| s.path() == path) {
            let session = self.sessions.remove(index);
            log::info!("device removed: {}", path.display());
            let _ = session.close();
        }
    }

    fn pump_ready_sessions(&mut self) -> Result<(), DeviceError> {
        if self.sessions.is_empty() {
            std::thread::sleep(POLL_TIMEOUT);
            return Ok(());
        }

        let borrowed: Vec<BorrowedFd<'_>> = self.sessions.iter().map(|s| unsafe { BorrowedFd::borrow_raw(s.raw_fd()) }).collect();
        let mut poll_fds: Vec<PollFd> = borrowed.iter().map(|fd| PollFd::new(*fd, PollFlags::POLLIN)).collect();

        let timeout = PollTimeout::try_from(POLL_TIMEOUT.as_millis() as u16).unwrap_or(PollTimeout::MAX);
        if poll(&mut poll_fds, timeout).is_err() {
            return Ok(());
        }

        for (session, pfd) in self.sessions.iter_mut().zip(poll_fds.iter()) {
            if pfd.revents().unwrap_or(PollFlags::empty()).intersects(PollFlags::POLLIN) {
                session.pump(&mut self.output)?;
            }
        }
        Ok(())
    }
}
