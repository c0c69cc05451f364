//! The descriptor model: what happens when a keycode is pressed on a given layer.

use crate::keycodes::Keycode;
use crate::modifier::ModifierMask;
use std::sync::Arc;

/// "Press this key with these modifiers held," the unit of emission for a key sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySequence {
    pub mods: ModifierMask,
    pub key: Keycode,
}

impl KeySequence {
    pub const fn new(mods: ModifierMask, key: Keycode) -> Self {
        Self { mods, key }
    }

    pub const fn bare(key: Keycode) -> Self {
        Self { mods: ModifierMask::empty(), key }
    }
}

/// One step of a [`Descriptor::Macro`]: either a key sequence to tap, or a pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroStep {
    Tap(KeySequence),
    Timeout(u32),
}

/// The rule governing what happens when a keycode is pressed on a given layer.
///
/// Variants correspond 1:1 to the action vocabulary: a descriptor is either undefined or
/// carries exactly the argument slots its action needs. Because this is a closed Rust enum
/// rather than a C tagged union with a numeric action byte, an out-of-range action is not
/// a representable value — the corresponding "propagation policy" failure mode in the
/// error-handling design is eliminated by construction rather than checked at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    Undefined,
    KeySeq(KeySequence),
    Macro(Arc<[MacroStep]>),
    Layer(usize),
    LayerToggle(usize),
    OneShot(usize),
    Overload(KeySequence, usize),
    TapHold(KeySequence, usize),
    Layout(usize, usize),
}

impl Default for Descriptor {
    fn default() -> Self {
        Descriptor::Undefined
    }
}
