//! Key code mapping between the core's raw `Keycode` and the `evdev`/`uinput` crates.
//!
//! Unlike the teacher's `KeyCode`, the core's `Keycode` already *is* the Linux kernel's
//! numeric `KEY_*`/`BTN_*` value (see `keycodes.rs`), so the `evdev` direction is a plain
//! cast. Only `uinput`, whose builder wants a typed enum rather than a raw code, needs a
//! real lookup table.

use crate::keycodes::{self, Keycode};
use evdev::Key as EvKey;
use uinput::event::controller::{Controller, Mouse};
use uinput::event::keyboard::{Key as UKey, KeyPad as UKeyPad, Misc};
use uinput::event::keyboard::Keyboard as UKeyboard;

/// Converts a core keycode to the `evdev` key used for device capability checks and,
/// where relevant, for interpreting raw `EV_KEY` codes read off the wire.
pub fn to_evdev_key(code: Keycode) -> EvKey {
    EvKey::new(code)
}

/// Converts an `evdev` key back to a core keycode. Infallible: both sides share the same
/// numeric space.
pub fn from_evdev_key(key: EvKey) -> Keycode {
    key.code()
}

/// Converts a core keycode to the `uinput` keyboard-event variant used to inject it into
/// the virtual keyboard. Returns `None` for mouse buttons (see [`to_uinput_button`]) or any
/// code this daemon has no symbolic name for.
pub fn to_uinput_key(code: Keycode) -> Option<UKeyboard> {
    use keycodes::*;
    Some(match code {
        A => UKeyboard::Key(UKey::A),
        keycodes::B => UKeyboard::Key(UKey::B),
        keycodes::C => UKeyboard::Key(UKey::C),
        D => UKeyboard::Key(UKey::D),
        E => UKeyboard::Key(UKey::E),
        F => UKeyboard::Key(UKey::F),
        G => UKeyboard::Key(UKey::G),
        H => UKeyboard::Key(UKey::H),
        I => UKeyboard::Key(UKey::I),
        J => UKeyboard::Key(UKey::J),
        K => UKeyboard::Key(UKey::K),
        L => UKeyboard::Key(UKey::L),
        M => UKeyboard::Key(UKey::M),
        N => UKeyboard::Key(UKey::N),
        O => UKeyboard::Key(UKey::O),
        P => UKeyboard::Key(UKey::P),
        Q => UKeyboard::Key(UKey::Q),
        R => UKeyboard::Key(UKey::R),
        S => UKeyboard::Key(UKey::S),
        T => UKeyboard::Key(UKey::T),
        U => UKeyboard::Key(UKey::U),
        V => UKeyboard::Key(UKey::V),
        W => UKeyboard::Key(UKey::W),
        X => UKeyboard::Key(UKey::X),
        Y => UKeyboard::Key(UKey::Y),
        Z => UKeyboard::Key(UKey::Z),

        KEY_1 => UKeyboard::Key(UKey::_1),
        KEY_2 => UKeyboard::Key(UKey::_2),
        KEY_3 => UKeyboard::Key(UKey::_3),
        KEY_4 => UKeyboard::Key(UKey::_4),
        KEY_5 => UKeyboard::Key(UKey::_5),
        KEY_6 => UKeyboard::Key(UKey::_6),
        KEY_7 => UKeyboard::Key(UKey::_7),
        KEY_8 => UKeyboard::Key(UKey::_8),
        KEY_9 => UKeyboard::Key(UKey::_9),
        KEY_0 => UKeyboard::Key(UKey::_0),

        F1 => UKeyboard::Key(UKey::F1),
        F2 => UKeyboard::Key(UKey::F2),
        F3 => UKeyboard::Key(UKey::F3),
        F4 => UKeyboard::Key(UKey::F4),
        F5 => UKeyboard::Key(UKey::F5),
        F6 => UKeyboard::Key(UKey::F6),
        F7 => UKeyboard::Key(UKey::F7),
        F8 => UKeyboard::Key(UKey::F8),
        F9 => UKeyboard::Key(UKey::F9),
        F10 => UKeyboard::Key(UKey::F10),
        F11 => UKeyboard::Key(UKey::F11),
        F12 => UKeyboard::Key(UKey::F12),

        LEFTSHIFT => UKeyboard::Key(UKey::LeftShift),
        RIGHTSHIFT => UKeyboard::Key(UKey::RightShift),
        LEFTCTRL => UKeyboard::Key(UKey::LeftControl),
        RIGHTCTRL => UKeyboard::Key(UKey::RightControl),
        LEFTALT => UKeyboard::Key(UKey::LeftAlt),
        RIGHTALT => UKeyboard::Key(UKey::RightAlt),
        LEFTMETA => UKeyboard::Key(UKey::LeftMeta),
        RIGHTMETA => UKeyboard::Key(UKey::RightMeta),

        ESC => UKeyboard::Key(UKey::Esc),
        ENTER => UKeyboard::Key(UKey::Enter),
        BACKSPACE => UKeyboard::Key(UKey::BackSpace),
        TAB => UKeyboard::Key(UKey::Tab),
        SPACE => UKeyboard::Key(UKey::Space),
        CAPSLOCK => UKeyboard::Key(UKey::CapsLock),
        NUMLOCK => UKeyboard::Key(UKey::NumLock),
        SCROLLLOCK => UKeyboard::Key(UKey::ScrollLock),
        SYSRQ => UKeyboard::Key(UKey::SysRq),
        PAUSE => UKeyboard::Misc(Misc::Pause),
        INSERT => UKeyboard::Key(UKey::Insert),
        DELETE => UKeyboard::Key(UKey::Delete),
        HOME => UKeyboard::Key(UKey::Home),
        END => UKeyboard::Key(UKey::End),
        PAGEUP => UKeyboard::Key(UKey::PageUp),
        PAGEDOWN => UKeyboard::Key(UKey::PageDown),
        COMPOSE => UKeyboard::Misc(Misc::Menu),

        LEFT => UKeyboard::Key(UKey::Left),
        RIGHT => UKeyboard::Key(UKey::Right),
        UP => UKeyboard::Key(UKey::Up),
        DOWN => UKeyboard::Key(UKey::Down),

        LEFTBRACE => UKeyboard::Key(UKey::LeftBrace),
        RIGHTBRACE => UKeyboard::Key(UKey::RightBrace),
        BACKSLASH => UKeyboard::Key(UKey::BackSlash),
        SEMICOLON => UKeyboard::Key(UKey::SemiColon),
        APOSTROPHE => UKeyboard::Key(UKey::Apostrophe),
        COMMA => UKeyboard::Key(UKey::Comma),
        DOT => UKeyboard::Key(UKey::Dot),
        SLASH => UKeyboard::Key(UKey::Slash),
        GRAVE => UKeyboard::Key(UKey::Grave),
        MINUS => UKeyboard::Key(UKey::Minus),
        EQUAL => UKeyboard::Key(UKey::Equal),

        KP0 => UKeyboard::KeyPad(UKeyPad::_0),
        KP1 => UKeyboard::KeyPad(UKeyPad::_1),
        KP2 => UKeyboard::KeyPad(UKeyPad::_2),
        KP3 => UKeyboard::KeyPad(UKeyPad::_3),
        KP4 => UKeyboard::KeyPad(UKeyPad::_4),
        KP5 => UKeyboard::KeyPad(UKeyPad::_5),
        KP6 => UKeyboard::KeyPad(UKeyPad::_6),
        KP7 => UKeyboard::KeyPad(UKeyPad::_7),
        KP8 => UKeyboard::KeyPad(UKeyPad::_8),
        KP9 => UKeyboard::KeyPad(UKeyPad::_9),
        KPSLASH => UKeyboard::KeyPad(UKeyPad::Slash),
        KPASTERISK => UKeyboard::KeyPad(UKeyPad::Asterisk),
        KPMINUS => UKeyboard::KeyPad(UKeyPad::Minus),
        KPPLUS => UKeyboard::KeyPad(UKeyPad::Plus),
        KPENTER => UKeyboard::KeyPad(UKeyPad::Enter),
        KPDOT => UKeyboard::KeyPad(UKeyPad::Dot),

        _ => return None,
    })
}

/// Converts a core keycode to the `uinput` controller-event variant used for mouse
/// buttons. Returns `None` for anything [`crate::keycodes::is_mouse_button`] doesn't claim.
pub fn to_uinput_button(code: Keycode) -> Option<Controller> {
    match code {
        keycodes::BTN_LEFT => Some(Controller::Mouse(Mouse::Left)),
        0x111 => Some(Controller::Mouse(Mouse::Right)),
        0x112 => Some(Controller::Mouse(Mouse::Middle)),
        0x113 => Some(Controller::Mouse(Mouse::Side)),
        0x114 => Some(Controller::Mouse(Mouse::Extra)),
        _ => None,
    }
}
