//! A named, keycode-indexed set of descriptors with an associated modifier mask.

use super::descriptor::Descriptor;
use crate::keycodes::{Keycode, KEY_CNT};
use crate::modifier::ModifierMask;
use std::cell::Cell;

/// A layer's `active`/`timestamp` are the only fields that change after construction
/// (DESIGN.md, Open Question 1), so they live in `Cell`s inside an otherwise immutable
/// record. The single-threaded event loop (no other thread ever touches a `Layer`) makes
/// this sound without a `Mutex`.
#[derive(Debug)]
pub struct Layer {
    name: String,
    descriptors: Box<[Descriptor]>,
    pub mods: ModifierMask,
    active: Cell<bool>,
    timestamp: Cell<u64>,
}

impl Layer {
    pub fn new(name: impl Into<String>, mods: ModifierMask) -> Self {
        Self {
            name: name.into(),
            descriptors: std::iter::repeat_with(Descriptor::default)
                .take(KEY_CNT)
                .collect(),
            mods,
            active: Cell::new(false),
            timestamp: Cell::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the descriptor bound to `code`. Only ever called by the config loader while
    /// building the layer, before it is shared behind an `Arc<LayerSet>`.
    pub fn bind(&mut self, code: Keycode, descriptor: Descriptor) {
        self.descriptors[code as usize] = descriptor;
    }

    pub fn descriptor(&self, code: Keycode) -> &Descriptor {
        &self.descriptors[code as usize]
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn set_active(&self, value: bool) {
        self.active.set(value);
    }

    pub fn toggle_active(&self) {
        self.active.set(!self.active.get());
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp.get()
    }

    /// Activates the layer and stamps its timestamp with `now`, matching the C original's
    /// `layer->active = 1; layer->timestamp = get_time();` pairing.
    pub fn activate(&self, now: u64) {
        self.active.set(true);
        self.timestamp.set(now);
    }

    /// Toggles `active` and stamps `timestamp`, matching the press-time handling shared by
    /// LAYER/OVERLOAD/TAP_HOLD (`layer->active = !layer->active; layer->timestamp = ...`).
    pub fn toggle_and_stamp(&self, now: u64) {
        self.toggle_active();
        self.timestamp.set(now);
    }
}
