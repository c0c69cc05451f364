//! Process entry point: CLI parsing, logging/lock setup, and the three run modes named
//! in §6's CLI surface (run, monitor, list-keys). `-v`/`--version` is handled by `clap`.

use clap::Parser;
use keylayerd::cli::Cli;
use keylayerd::config;
use keylayerd::daemon::Daemon;
use keylayerd::error::DaemonError;
use keylayerd::keycodes;
use keylayerd::lock::{self, InstanceLock};
use keylayerd::logging;
use keylayerd::output::{RawEvent, VirtualOutput};
use keylayerd::platform::linux::{EvdevInput, LinuxDiscovery, UinputSink};
use keylayerd::platform::{Discovery, InputSource};

fn main() {
    logging::init();

    let cli = Cli::parse();

    let result = if cli.list_keys {
        run_list_keys()
    } else if cli.monitor {
        run_monitor()
    } else {
        run_daemon(cli.daemonize)
    };

    if let Err(err) = result {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run_list_keys() -> Result<(), DaemonError> {
    for name in keycodes::list_all_names() {
        println!("{name}");
    }
    Ok(())
}

fn run_monitor() -> Result<(), DaemonError> {
    let mut discovery = LinuxDiscovery::new();
    let mut inputs: Vec<EvdevInput> = discovery
        .scan()?
        .into_iter()
        .filter_map(|path| EvdevInput::open(&path).ok())
        .collect();

    println!("monitoring {} device(s); press ctrl-c to stop", inputs.len());

    loop {
        for input in inputs.iter_mut() {
            for event in input.drain_events()? {
                if let RawEvent::Key { code, value } = event {
                    if value == 2 {
                        continue;
                    }
                    let name = keycodes::name_for(code).unwrap_or("?");
                    let direction = if value == 0 { "up" } else { "down" };
                    println!("{}: {name} {direction}", input.name());
                }
            }
        }
        std::thread::sleep(std::time::Duration::from_millis(20));
    }
}

fn run_daemon(daemonize: bool) -> Result<(), DaemonError> {
    if daemonize {
        daemonize_process()?;
    }

    let _lock = InstanceLock::acquire(&lock::default_lock_path())?;

    let config_dir = config::default_config_dir()?;
    let profiles = config::load_dir(&config_dir)?;

    let sink = UinputSink::create()?;
    let output = VirtualOutput::new(Box::new(sink));

    let daemon = Daemon::new(profiles, output)?;
    daemon.run()
}

/// Double-forks and redirects `stdout`/`stderr` to the log file, matching §6d's
/// daemonization contract.
fn daemonize_process() -> Result<(), DaemonError> {
    use nix::unistd::{fork, setsid, ForkResult};

    // SAFETY: called before any threads are spawned and before any file descriptors
    // besides stdio are opened.
    match unsafe { fork() } {
        Ok(ForkResult::Parent { .. }) => std::process::exit(0),
        Ok(ForkResult::Child) => {}
        Err(source) => return Err(std::io::Error::from(source).into()),
    }

    setsid().map_err(std::io::Error::from)?;

    match unsafe { fork() } {
        Ok(ForkResult::Parent { .. }) => std::process::exit(0),
        Ok(ForkResult::Child) => {}
        Err(source) => return Err(std::io::Error::from(source).into()),
    }

    redirect_stdio_to_log()
}

fn redirect_stdio_to_log() -> Result<(), DaemonError> {
    use nix::unistd::dup2;
    use std::fs::OpenOptions;
    use std::os::unix::io::AsRawFd;

    let log_file = OpenOptions::new().create(true).append(true).open("/var/log/keylayerd.log").map_err(DaemonError::from)?;
    let fd = log_file.as_raw_fd();
    dup2(fd, 1).map_err(std::io::Error::from)?;
    dup2(fd, 2).map_err(std::io::Error::from)?;
    std::mem::forget(log_file);
    Ok(())
}

