//! In-memory representation of the transformation rules: a set of named layers, each
//! holding a dense keycode-indexed array of key descriptors and an associated modifier
//! mask.

pub mod descriptor;
pub mod layer;

pub use descriptor::{Descriptor, KeySequence, MacroStep};
pub use layer::Layer;

/// An ordered, immutable collection of [`Layer`]s. Built once by the config loader and
/// shared (via `Arc`) by every [`crate::keyboard::Keyboard`] using the same named profile.
#[derive(Debug)]
pub struct LayerSet {
    layers: Vec<Layer>,
}

impl LayerSet {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.layers.iter()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name() == name)
    }
}

impl std::ops::Index<usize> for LayerSet {
    type Output = Layer;

    fn index(&self, index: usize) -> &Layer {
        &self.layers[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::ModifierMask;

    #[test]
    fn index_of_finds_layer_by_name() {
        let set = LayerSet::new(vec![
            Layer::new("main", ModifierMask::empty()),
            Layer::new("nav", ModifierMask::empty()),
        ]);
        assert_eq!(set.index_of("nav"), Some(1));
        assert_eq!(set.index_of("missing"), None);
    }
}
