//! Static mapping between symbolic key names and kernel keycodes, with optional
//! alternate and shifted glyph names. Consumed by the config parser and by
//! monitor/list mode (`-m`, `-l`).

/// A 16-bit integer identifying a physical key as defined by the host input subsystem.
pub type Keycode = u16;

/// Size of the dense keycode-indexed arrays used throughout the core (layer descriptor
/// arrays, the virtual output's `keystate`, per-keycode caches).
pub const KEY_CNT: usize = 768;

/// Reserved sentinel meaning "emit nothing". Chosen outside the kernel's real keycode
/// range (`0..KEY_CNT`) so it can never collide with an addressable descriptor slot.
pub const KEY_NOOP: Keycode = 0xffff;

pub const ESC: Keycode = 1;
pub const KEY_1: Keycode = 2;
pub const KEY_2: Keycode = 3;
pub const KEY_3: Keycode = 4;
pub const KEY_4: Keycode = 5;
pub const KEY_5: Keycode = 6;
pub const KEY_6: Keycode = 7;
pub const KEY_7: Keycode = 8;
pub const KEY_8: Keycode = 9;
pub const KEY_9: Keycode = 10;
pub const KEY_0: Keycode = 11;
pub const MINUS: Keycode = 12;
pub const EQUAL: Keycode = 13;
pub const BACKSPACE: Keycode = 14;
pub const TAB: Keycode = 15;
pub const Q: Keycode = 16;
pub const W: Keycode = 17;
pub const E: Keycode = 18;
pub const R: Keycode = 19;
pub const T: Keycode = 20;
pub const Y: Keycode = 21;
pub const U: Keycode = 22;
pub const I: Keycode = 23;
pub const O: Keycode = 24;
pub const P: Keycode = 25;
pub const LEFTBRACE: Keycode = 26;
pub const RIGHTBRACE: Keycode = 27;
pub const ENTER: Keycode = 28;
pub const LEFTCTRL: Keycode = 29;
pub const A: Keycode = 30;
pub const S: Keycode = 31;
pub const D: Keycode = 32;
pub const F: Keycode = 33;
pub const G: Keycode = 34;
pub const H: Keycode = 35;
pub const J: Keycode = 36;
pub const K: Keycode = 37;
pub const L: Keycode = 38;
pub const SEMICOLON: Keycode = 39;
pub const APOSTROPHE: Keycode = 40;
pub const GRAVE: Keycode = 41;
pub const LEFTSHIFT: Keycode = 42;
pub const BACKSLASH: Keycode = 43;
pub const Z: Keycode = 44;
pub const X: Keycode = 45;
pub const C: Keycode = 46;
pub const V: Keycode = 47;
pub const B: Keycode = 48;
pub const N: Keycode = 49;
pub const M: Keycode = 50;
pub const COMMA: Keycode = 51;
pub const DOT: Keycode = 52;
pub const SLASH: Keycode = 53;
pub const RIGHTSHIFT: Keycode = 54;
pub const KPASTERISK: Keycode = 55;
pub const LEFTALT: Keycode = 56;
pub const SPACE: Keycode = 57;
pub const CAPSLOCK: Keycode = 58;
pub const F1: Keycode = 59;
pub const F2: Keycode = 60;
pub const F3: Keycode = 61;
pub const F4: Keycode = 62;
pub const F5: Keycode = 63;
pub const F6: Keycode = 64;
pub const F7: Keycode = 65;
pub const F8: Keycode = 66;
pub const F9: Keycode = 67;
pub const F10: Keycode = 68;
pub const NUMLOCK: Keycode = 69;
pub const SCROLLLOCK: Keycode = 70;
pub const KP7: Keycode = 71;
pub const KP8: Keycode = 72;
pub const KP9: Keycode = 73;
pub const KPMINUS: Keycode = 74;
pub const KP4: Keycode = 75;
pub const KP5: Keycode = 76;
pub const KP6: Keycode = 77;
pub const KPPLUS: Keycode = 78;
pub const KP1: Keycode = 79;
pub const KP2: Keycode = 80;
pub const KP3: Keycode = 81;
pub const KP0: Keycode = 82;
pub const KPDOT: Keycode = 83;
pub const F11: Keycode = 87;
pub const F12: Keycode = 88;
pub const KPENTER: Keycode = 96;
pub const RIGHTCTRL: Keycode = 97;
pub const KPSLASH: Keycode = 98;
pub const SYSRQ: Keycode = 99;
pub const RIGHTALT: Keycode = 100;
pub const HOME: Keycode = 102;
pub const UP: Keycode = 103;
pub const PAGEUP: Keycode = 104;
pub const LEFT: Keycode = 105;
pub const RIGHT: Keycode = 106;
pub const END: Keycode = 107;
pub const DOWN: Keycode = 108;
pub const PAGEDOWN: Keycode = 109;
pub const INSERT: Keycode = 110;
pub const DELETE: Keycode = 111;
pub const PAUSE: Keycode = 119;
pub const LEFTMETA: Keycode = 125;
pub const RIGHTMETA: Keycode = 126;
pub const COMPOSE: Keycode = 127;

/// First mouse-button keycode (`BTN_0`); used by `is_mouse_button`.
pub const BTN_0: Keycode = 0x100;
/// Last of the numbered mouse-button keycodes (`BTN_9`).
pub const BTN_9: Keycode = 0x109;
/// First of the named mouse-button keycodes (`BTN_LEFT`).
pub const BTN_LEFT: Keycode = 0x110;
/// Last of the named mouse-button keycodes (`BTN_TASK`).
pub const BTN_TASK: Keycode = 0x117;

/// `EV_REL` axis codes advertised on the virtual pointer, matching `linux/input-event-codes.h`.
pub const REL_X: u16 = 0x00;
pub const REL_Y: u16 = 0x01;
pub const REL_Z: u16 = 0x02;
pub const REL_HWHEEL: u16 = 0x06;
pub const REL_WHEEL: u16 = 0x08;

/// True if `code` identifies a mouse button rather than a keyboard key, matching the
/// original `IS_MOUSE_BTN` range check.
pub fn is_mouse_button(code: Keycode) -> bool {
    (BTN_LEFT..=BTN_TASK).contains(&code) || (BTN_0..=BTN_9).contains(&code)
}

struct Entry {
    name: &'static str,
    code: Keycode,
    alt_name: Option<&'static str>,
    shifted_name: Option<&'static str>,
}

macro_rules! entry {
    ($name:expr, $code:expr) => {
        Entry { name: $name, code: $code, alt_name: None, shifted_name: None }
    };
    ($name:expr, $code:expr, shifted = $shifted:expr) => {
        Entry { name: $name, code: $code, alt_name: None, shifted_name: Some($shifted) }
    };
    ($name:expr, $code:expr, alt = $alt:expr) => {
        Entry { name: $name, code: $code, alt_name: Some($alt), shifted_name: None }
    };
}

static TABLE: &[Entry] = &[
    entry!("esc", ESC),
    entry!("1", KEY_1, shifted = "!"),
    entry!("2", KEY_2, shifted = "@"),
    entry!("3", KEY_3, shifted = "#"),
    entry!("4", KEY_4, shifted = "$"),
    entry!("5", KEY_5, shifted = "%"),
    entry!("6", KEY_6, shifted = "^"),
    entry!("7", KEY_7, shifted = "&"),
    entry!("8", KEY_8, shifted = "*"),
    entry!("9", KEY_9, shifted = "("),
    entry!("0", KEY_0, shifted = ")"),
    entry!("minus", MINUS, shifted = "_"),
    entry!("equal", EQUAL, shifted = "+"),
    entry!("backspace", BACKSPACE, alt = "bspc"),
    entry!("tab", TAB),
    entry!("q", Q),
    entry!("w", W),
    entry!("e", E),
    entry!("r", R),
    entry!("t", T),
    entry!("y", Y),
    entry!("u", U),
    entry!("i", I),
    entry!("o", O),
    entry!("p", P),
    entry!("leftbrace", LEFTBRACE, shifted = "{"),
    entry!("rightbrace", RIGHTBRACE, shifted = "}"),
    entry!("enter", ENTER, alt = "ret"),
    entry!("leftcontrol", LEFTCTRL, alt = "leftctrl"),
    entry!("a", A),
    entry!("s", S),
    entry!("d", D),
    entry!("f", F),
    entry!("g", G),
    entry!("h", H),
    entry!("j", J),
    entry!("k", K),
    entry!("l", L),
    entry!("semicolon", SEMICOLON, shifted = ":"),
    entry!("apostrophe", APOSTROPHE, shifted = "\""),
    entry!("grave", GRAVE, shifted = "~"),
    entry!("leftshift", LEFTSHIFT),
    entry!("backslash", BACKSLASH, shifted = "|"),
    entry!("z", Z),
    entry!("x", X),
    entry!("c", C),
    entry!("v", V),
    entry!("b", B),
    entry!("n", N),
    entry!("m", M),
    entry!("comma", COMMA, shifted = "<"),
    entry!("dot", DOT, shifted = ">"),
    entry!("slash", SLASH, shifted = "?"),
    entry!("rightshift", RIGHTSHIFT),
    entry!("kpasterisk", KPASTERISK),
    entry!("leftalt", LEFTALT),
    entry!("space", SPACE),
    entry!("capslock", CAPSLOCK),
    entry!("f1", F1),
    entry!("f2", F2),
    entry!("f3", F3),
    entry!("f4", F4),
    entry!("f5", F5),
    entry!("f6", F6),
    entry!("f7", F7),
    entry!("f8", F8),
    entry!("f9", F9),
    entry!("f10", F10),
    entry!("numlock", NUMLOCK),
    entry!("scrolllock", SCROLLLOCK),
    entry!("kp7", KP7),
    entry!("kp8", KP8),
    entry!("kp9", KP9),
    entry!("kpminus", KPMINUS),
    entry!("kp4", KP4),
    entry!("kp5", KP5),
    entry!("kp6", KP6),
    entry!("kpplus", KPPLUS),
    entry!("kp1", KP1),
    entry!("kp2", KP2),
    entry!("kp3", KP3),
    entry!("kp0", KP0),
    entry!("kpdot", KPDOT),
    entry!("f11", F11),
    entry!("f12", F12),
    entry!("kpenter", KPENTER),
    entry!("rightcontrol", RIGHTCTRL, alt = "rightctrl"),
    entry!("kpslash", KPSLASH),
    entry!("sysrq", SYSRQ),
    entry!("rightalt", RIGHTALT),
    entry!("home", HOME),
    entry!("up", UP),
    entry!("pageup", PAGEUP),
    entry!("left", LEFT),
    entry!("right", RIGHT),
    entry!("end", END),
    entry!("down", DOWN),
    entry!("pagedown", PAGEDOWN),
    entry!("insert", INSERT),
    entry!("delete", DELETE),
    entry!("pause", PAUSE),
    entry!("leftmeta", LEFTMETA, alt = "super"),
    entry!("rightmeta", RIGHTMETA),
    entry!("compose", COMPOSE, alt = "menu"),
];

/// Look up a keycode by its primary, alternate, or shifted-glyph name. Case-insensitive
/// (the table itself is all lowercase), so config authors can write `CAPSLOCK` or
/// `capslock` interchangeably.
pub fn lookup_by_name(name: &str) -> Option<Keycode> {
    let name = name.to_ascii_lowercase();
    let name = name.as_str();
    TABLE.iter().find_map(|e| {
        if e.name == name || e.alt_name == Some(name) || e.shifted_name == Some(name) {
            Some(e.code)
        } else {
            None
        }
    })
}

/// Returns the primary symbolic name for `code`, if known.
pub fn name_for(code: Keycode) -> Option<&'static str> {
    TABLE.iter().find(|e| e.code == code).map(|e| e.name)
}

/// Iterates every known name (primary, then alternate, then shifted) in table order,
/// matching the `-l` CLI flag's listing format.
pub fn list_all_names() -> impl Iterator<Item = &'static str> {
    TABLE.iter().flat_map(|e| {
        [Some(e.name), e.alt_name, e.shifted_name]
            .into_iter()
            .flatten()
    })
}
