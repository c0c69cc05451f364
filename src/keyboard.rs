//! The logical keyboard: a shared layer set plus the two distinguished base-layer indices.
//!
//! Deliberately holds no file descriptor. §3 lists the grabbed device's fd as a `Keyboard`
//! attribute, but ownership of that fd belongs to the device session (`crate::session`),
//! matching the split the teacher's `device_manager::linux::ManagedDevice` makes between a
//! device's *logical* configuration and its *session* resources (open fd, grab state).
//! Multiple sessions built from the same named profile share one `Keyboard`/`Arc<LayerSet>`,
//! which is exactly how layer-activation state composes across physical keyboards per §5.

use crate::keymap::LayerSet;
use crate::modifier::ModifierMask;
use std::cell::Cell;
use std::sync::Arc;

pub struct Keyboard {
    layers: Arc<LayerSet>,
    layout: Cell<usize>,
    modlayout: Cell<usize>,
}

impl Keyboard {
    pub fn new(layers: Arc<LayerSet>, layout: usize, modlayout: usize) -> Self {
        assert!(layout < layers.len(), "layout index out of range");
        assert!(modlayout < layers.len(), "modlayout index out of range");
        Self {
            layers,
            layout: Cell::new(layout),
            modlayout: Cell::new(modlayout),
        }
    }

    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    pub fn layout(&self) -> usize {
        self.layout.get()
    }

    pub fn modlayout(&self) -> usize {
        self.modlayout.get()
    }

    /// Implements the LAYOUT action: immediately replace both base-layer indices.
    pub fn set_layout(&self, layout: usize, modlayout: usize) {
        self.layout.set(layout);
        self.modlayout.set(modlayout);
    }

    /// The union of modifier masks of every currently active layer, matching
    /// `reify_layer_mods`'s summation in the original.
    pub fn active_mods_union(&self) -> ModifierMask {
        self.layers
            .iter()
            .filter(|l| l.is_active())
            .fold(ModifierMask::empty(), |acc, l| acc | l.mods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::Layer;

    fn sample_keyboard() -> Keyboard {
        let layers = Arc::new(LayerSet::new(vec![
            Layer::new("main", ModifierMask::empty()),
            Layer::new("mods", ModifierMask::CTRL),
        ]));
        Keyboard::new(layers, 0, 0)
    }

    #[test]
    fn active_mods_union_sums_only_active_layers() {
        let kbd = sample_keyboard();
        assert_eq!(kbd.active_mods_union(), ModifierMask::empty());
        kbd.layers()[1].set_active(true);
        assert_eq!(kbd.active_mods_union(), ModifierMask::CTRL);
    }

    #[test]
    fn set_layout_updates_both_indices() {
        let kbd = sample_keyboard();
        kbd.set_layout(1, 1);
        assert_eq!(kbd.layout(), 1);
        assert_eq!(kbd.modlayout(), 1);
    }

    #[test]
    #[should_panic(expected = "layout index out of range")]
    fn construction_rejects_out_of_range_layout() {
        let layers = Arc::new(LayerSet::new(vec![Layer::new("main", ModifierMask::empty())]));
        Keyboard::new(layers, 5, 0);
    }
}
