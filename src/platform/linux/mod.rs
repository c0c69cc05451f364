//! Linux backend: `evdev` for capture, `uinput` for injection, a directory-scan
//! discovery collaborator (§6a-§6d's concrete backends).

pub mod discovery;
pub mod input_capture;
pub mod keycode_map;
pub mod output_injection;

pub use discovery::LinuxDiscovery;
pub use input_capture::EvdevInput;
pub use output_injection::UinputSink;
