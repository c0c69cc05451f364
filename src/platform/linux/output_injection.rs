//! Linux output injection via `uinput` (§6 "Virtual device contract"): two synthetic
//! devices, a keyboard and a pointer, backing the core's [`OutputSink`].

use crate::error::PlatformError;
use crate::keycodes::{is_mouse_button, Keycode, KEY_CNT};
use crate::output::{OutputSink, RawEvent};
use uinput::event::relative::{Position, Relative, Wheel};
use uinput::Device as UDevice;

use super::keycode_map::{to_uinput_button, to_uinput_key};

pub const VIRTUAL_KEYBOARD_NAME: &str = "keylayerd virtual keyboard";
pub const VIRTUAL_POINTER_NAME: &str = "keylayerd virtual pointer";

/// Drives the two virtual devices named in the platform contract. Every keycode in
/// `0..KEY_CNT` except mouse buttons is advertised on the keyboard; mouse buttons and the
/// `X`/`Y`/`Z`/`WHEEL`/`HWHEEL` relative axes are advertised on the pointer.
pub struct UinputSink {
    keyboard: UDevice,
    pointer: UDevice,
}

impl UinputSink {
    pub fn create() -> Result<Self, PlatformError> {
        let mut keyboard_builder = uinput::default()
            .map_err(|source| PlatformError::UinputOpen { source: to_io_error(source) })?
            .name(VIRTUAL_KEYBOARD_NAME)
            .map_err(|source| PlatformError::VirtualDeviceCreate { kind: "keyboard", source: to_io_error(source) })?;

        for code in 0..KEY_CNT as Keycode {
            if is_mouse_button(code) {
                continue;
            }
            if let Some(key) = to_uinput_key(code) {
                keyboard_builder = keyboard_builder
                    .event(key)
                    .map_err(|source| PlatformError::VirtualDeviceCreate { kind: "keyboard", source: to_io_error(source) })?;
            }
        }

        let keyboard = keyboard_builder
            .create()
            .map_err(|source| PlatformError::VirtualDeviceCreate { kind: "keyboard", source: to_io_error(source) })?;

        let mut pointer_builder = uinput::default()
            .map_err(|source| PlatformError::UinputOpen { source: to_io_error(source) })?
            .name(VIRTUAL_POINTER_NAME)
            .map_err(|source| PlatformError::VirtualDeviceCreate { kind: "pointer", source: to_io_error(source) })?
            .event(Relative::Position(Position::X))
            .map_err(|source| PlatformError::VirtualDeviceCreate { kind: "pointer", source: to_io_error(source) })?
            .event(Relative::Position(Position::Y))
            .map_err(|source| PlatformError::VirtualDeviceCreate { kind: "pointer", source: to_io_error(source) })?
            .event(Relative::Position(Position::Z))
            .map_err(|source| PlatformError::VirtualDeviceCreate { kind: "pointer", source: to_io_error(source) })?
            .event(Relative::Wheel(Wheel::Vertical))
            .map_err(|source| PlatformError::VirtualDeviceCreate { kind: "pointer", source: to_io_error(source) })?
            .event(Relative::Wheel(Wheel::Horizontal))
            .map_err(|source| PlatformError::VirtualDeviceCreate { kind: "pointer", source: to_io_error(source) })?;

        for code in crate::keycodes::BTN_LEFT..=crate::keycodes::BTN_TASK {
            if let Some(button) = to_uinput_button(code) {
                pointer_builder = pointer_builder
                    .event(button)
                    .map_err(|source| PlatformError::VirtualDeviceCreate { kind: "pointer", source: to_io_error(source) })?;
            }
        }

        let pointer = pointer_builder
            .create()
            .map_err(|source| PlatformError::VirtualDeviceCreate { kind: "pointer", source: to_io_error(source) })?;

        Ok(Self { keyboard, pointer })
    }
}

fn to_io_error<E: std::fmt::Display>(e: E) -> std::io::Error {
    std::io::Error::other(e.to_string())
}

impl OutputSink for UinputSink {
    fn write_key(&mut self, code: Keycode, value: i32) {
        let Some(key) = to_uinput_key(code) else {
            log::warn!("no uinput mapping for keycode {code}, dropping emission");
            return;
        };
        let result = match value {
            0 => self.keyboard.release(&key),
            _ => self.keyboard.press(&key),
        };
        if let Err(source) = result.and_then(|()| self.keyboard.synchronize()) {
            log::warn!("failed to write key event for {code}: {source}");
        }
    }

    fn forward(&mut self, event: RawEvent) {
        let result = match event {
            RawEvent::Relative { axis, value } => match axis {
                crate::keycodes::REL_X => self.pointer.send(Position::X, value),
                crate::keycodes::REL_Y => self.pointer.send(Position::Y, value),
                crate::keycodes::REL_Z => self.pointer.send(Position::Z, value),
                crate::keycodes::REL_WHEEL => self.pointer.send(Wheel::Vertical, value),
                crate::keycodes::REL_HWHEEL => self.pointer.send(Wheel::Horizontal, value),
                _ => return,
            },
            RawEvent::Key { code, value } if is_mouse_button(code) => {
                let Some(button) = to_uinput_button(code) else { return };
                if value == 0 {
                    self.pointer.release(&button)
                } else {
                    self.pointer.press(&button)
                }
            }
            _ => return,
        };
        if let Err(source) = result.and_then(|()| self.pointer.synchronize()) {
            log::warn!("failed to forward pointer event: {source}");
        }
    }
}
