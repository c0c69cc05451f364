//! CLI surface (§6, §6d): parsed with `clap`'s derive API.

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "keylayerd", version, about = "A layered key-remapping daemon for evdev-based Linux input")]
pub struct Cli {
    /// Daemonize: double-fork and redirect stdout/stderr to the log file.
    #[arg(short = 'd', long = "daemonize")]
    pub daemonize: bool,

    /// Monitor mode: print every key press/release instead of remapping.
    #[arg(short = 'm', long = "monitor")]
    pub monitor: bool,

    /// List every known key name (including alternate and shifted names) and exit.
    #[arg(short = 'l', long = "list-keys")]
    pub list_keys: bool,
}
