//! The fixed modifier vocabulary and its canonical synthesis keycodes.

use crate::keycodes::Keycode;
use bitflags::bitflags;

bitflags! {
    /// A bit set over the fixed modifier vocabulary.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct ModifierMask: u8 {
        const CTRL   = 1 << 0;
        const SHIFT  = 1 << 1;
        const SUPER  = 1 << 2;
        const ALT    = 1 << 3;
        const ALT_GR = 1 << 4;
    }
}

/// The five synthesizable single-bit modifiers, in a fixed order used for reification.
pub const ALL_MODIFIERS: [ModifierMask; 5] = [
    ModifierMask::CTRL,
    ModifierMask::SHIFT,
    ModifierMask::SUPER,
    ModifierMask::ALT,
    ModifierMask::ALT_GR,
];

/// The canonical left-hand keycode used when synthesizing a single modifier bit.
///
/// Panics if `m` is not exactly one of the five known single-bit modifiers; callers only
/// ever invoke this with entries from [`ALL_MODIFIERS`].
pub fn canonical_keycode(m: ModifierMask) -> Keycode {
    match m {
        ModifierMask::CTRL => crate::keycodes::LEFTCTRL,
        ModifierMask::SHIFT => crate::keycodes::LEFTSHIFT,
        ModifierMask::SUPER => crate::keycodes::LEFTMETA,
        ModifierMask::ALT => crate::keycodes::LEFTALT,
        ModifierMask::ALT_GR => crate::keycodes::RIGHTALT,
        other => panic!("canonical_keycode called with non-canonical mask {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_keycodes_are_distinct() {
        let codes: Vec<_> = ALL_MODIFIERS.iter().map(|&m| canonical_keycode(m)).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(codes.len(), sorted.len());
    }

    #[test]
    fn union_contains_each_member() {
        let union = ModifierMask::CTRL | ModifierMask::SHIFT;
        assert!(union.contains(ModifierMask::CTRL));
        assert!(union.contains(ModifierMask::SHIFT));
        assert!(!union.contains(ModifierMask::ALT));
    }
}
