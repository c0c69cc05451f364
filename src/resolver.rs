//! The descriptor resolver (§4.3): given the current layer stack and an incoming keycode,
//! selects the descriptor that governs this event and computes the residual modifier mask.

use crate::keyboard::Keyboard;
use crate::keycodes::Keycode;
use crate::keymap::Descriptor;
use crate::modifier::ModifierMask;

/// The outcome of resolving a keycode against a keyboard's current layer stack.
pub struct Resolved<'a> {
    /// Index of the layer that owns the resolved descriptor. Either the *owning layer*
    /// found in step 1 of the algorithm, or the chosen base layer (`layout`/`modlayout`)
    /// when no active layer defines this keycode.
    pub layer_index: usize,
    pub descriptor: &'a Descriptor,
    /// The residual modifier mask to apply to the emission (step 2/3 of the algorithm).
    pub mods: ModifierMask,
}

/// Runs the four-step algorithm of §4.3. Returns `None` only when no owning layer exists,
/// no modifier layer is active, and the keyboard is not currently neutral with respect to
/// base-layer selection — i.e. never in practice, since `layout`/`modlayout` are always a
/// valid fallback; `None` is reserved for the case where some active layer *is* present but
/// defines nothing at this keycode and carries no modifiers of its own (a keyboard with no
/// active layers and no base layer would be a construction bug, guarded by `Keyboard::new`).
pub fn resolve<'a>(kbd: &'a Keyboard, code: Keycode) -> Option<Resolved<'a>> {
    let layers = kbd.layers();

    // Step 1: among active layers, the one with the greatest timestamp defining a
    // non-undefined descriptor at `code`. Strict `>` gives "first wins among equals".
    let mut owning: Option<(usize, u64)> = None;
    let mut any_active = false;

    for (index, layer) in layers.iter().enumerate() {
        if !layer.is_active() {
            continue;
        }
        any_active = true;

        let descriptor = layer.descriptor(code);
        if matches!(descriptor, Descriptor::Undefined) {
            continue;
        }

        let beats_current = match owning {
            None => true,
            Some((_, ts)) => layer.timestamp() > ts,
        };
        if beats_current {
            owning = Some((index, layer.timestamp()));
        }
    }

    // Step 2: residual mask excludes the owning layer's own modifiers.
    let residual = layers
        .iter()
        .enumerate()
        .filter(|(index, layer)| layer.is_active() && Some(*index) != owning.map(|(i, _)| i))
        .fold(ModifierMask::empty(), |acc, (_, layer)| acc | layer.mods);

    if let Some((index, _)) = owning {
        return Some(Resolved {
            layer_index: index,
            descriptor: layers[index].descriptor(code),
            mods: residual,
        });
    }

    // Step 3: no owning layer. Fall back to layout/modlayout based on the residual mask.
    let base_index = if residual == ModifierMask::SHIFT || residual == ModifierMask::ALT_GR {
        kbd.layout()
    } else if !residual.is_empty() {
        kbd.modlayout()
    } else if !any_active {
        kbd.layout()
    } else {
        return None;
    };

    Some(Resolved {
        layer_index: base_index,
        descriptor: layers[base_index].descriptor(code),
        mods: residual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keycodes;
    use crate::keymap::{Descriptor, KeySequence, Layer, LayerSet};
    use std::sync::Arc;

    fn build(layers: Vec<Layer>, layout: usize, modlayout: usize) -> Keyboard {
        Keyboard::new(Arc::new(LayerSet::new(layers)), layout, modlayout)
    }

    #[test]
    fn no_active_layer_falls_back_to_layout() {
        let mut main = Layer::new("main", ModifierMask::empty());
        main.bind(keycodes::A, Descriptor::KeySeq(KeySequence::bare(keycodes::A)));
        let kbd = build(vec![main], 0, 0);

        let r = resolve(&kbd, keycodes::A).unwrap();
        assert_eq!(r.layer_index, 0);
        assert_eq!(r.mods, ModifierMask::empty());
    }

    #[test]
    fn active_layer_with_mapping_wins_over_layout() {
        let main = Layer::new("main", ModifierMask::empty());
        let mut nav = Layer::new("nav", ModifierMask::empty());
        nav.bind(keycodes::H, Descriptor::KeySeq(KeySequence::bare(keycodes::LEFT)));
        let kbd = build(vec![main, nav], 0, 0);
        kbd.layers()[1].activate(10);

        let r = resolve(&kbd, keycodes::H).unwrap();
        assert_eq!(r.layer_index, 1);
        assert!(matches!(r.descriptor, Descriptor::KeySeq(seq) if seq.key == keycodes::LEFT));
    }

    #[test]
    fn modifier_layer_with_no_mapping_falls_back_to_modlayout() {
        let mut ctrl_layer = Layer::new("ctrl", ModifierMask::CTRL);
        ctrl_layer.activate(1);
        let mut modlayout = Layer::new("modlayout", ModifierMask::empty());
        modlayout.bind(keycodes::A, Descriptor::KeySeq(KeySequence::bare(keycodes::B)));
        let kbd = build(
            vec![Layer::new("main", ModifierMask::empty()), ctrl_layer, modlayout],
            0,
            2,
        );

        let r = resolve(&kbd, keycodes::A).unwrap();
        assert_eq!(r.layer_index, 2);
        assert_eq!(r.mods, ModifierMask::CTRL);
    }

    #[test]
    fn shift_only_residual_routes_to_layout_not_modlayout() {
        let mut shift_layer = Layer::new("shift", ModifierMask::SHIFT);
        shift_layer.activate(1);
        let mut layout = Layer::new("main", ModifierMask::empty());
        layout.bind(keycodes::A, Descriptor::KeySeq(KeySequence::bare(keycodes::A)));
        let mut modlayout = Layer::new("modlayout", ModifierMask::empty());
        modlayout.bind(keycodes::A, Descriptor::KeySeq(KeySequence::bare(keycodes::B)));
        let kbd = build(vec![layout, shift_layer, modlayout], 0, 2);

        let r = resolve(&kbd, keycodes::A).unwrap();
        assert_eq!(r.layer_index, 0);
    }

    #[test]
    fn tie_break_prefers_lower_index_on_equal_timestamp() {
        let mut first = Layer::new("first", ModifierMask::empty());
        first.bind(keycodes::A, Descriptor::KeySeq(KeySequence::bare(keycodes::B)));
        let mut second = Layer::new("second", ModifierMask::empty());
        second.bind(keycodes::A, Descriptor::KeySeq(KeySequence::bare(keycodes::C)));
        first.activate(100);
        second.activate(100);
        let kbd = build(vec![first, second], 0, 0);

        let r = resolve(&kbd, keycodes::A).unwrap();
        assert_eq!(r.layer_index, 0);
    }
}
