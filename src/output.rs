//! Virtual output (§4.1) and the modifier reifier (§4.2).
//!
//! `VirtualOutput` owns the process-wide `keystate` bit array (DESIGN NOTES: "Global mutable
//! keystate" — encapsulated here so only this object mutates it) and drives an injected
//! [`OutputSink`] that performs the actual platform writes. Keeping the sink behind a trait
//! lets the core be exercised in tests with no `/dev/uinput` access, mirroring the teacher's
//! `Platform` trait split between policy and hardware I/O.

use crate::keycodes::{Keycode, KEY_CNT, KEY_NOOP};
use crate::modifier::{canonical_keycode, ModifierMask, ALL_MODIFIERS};

/// A raw event as read from a physical device, or written to a virtual one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEvent {
    /// `EV_KEY`: `value` is 0 (release), 1 (press), or 2 (auto-repeat).
    Key { code: Keycode, value: i32 },
    /// `EV_REL`: a relative-axis motion, passed straight through to the pointer.
    Relative { axis: u16, value: i32 },
    /// Any other event type (e.g. `EV_MSC`); forwarded to the pointer sink unexamined.
    Other { event_type: u16, code: u16, value: i32 },
}

/// The platform-specific half of virtual output: actually writing events to `/dev/uinput`
/// (or, in tests, recording them). `write_key` is for the virtual keyboard; `forward` is for
/// anything destined for the virtual pointer (relative motion and mouse-button keys).
pub trait OutputSink {
    fn write_key(&mut self, code: Keycode, value: i32);
    fn forward(&mut self, event: RawEvent);
}

/// Drives an [`OutputSink`] while tracking the last value sent for every keycode, so that
/// press/release/reify can all reason about "is this keycode currently held."
pub struct VirtualOutput {
    keystate: Vec<bool>,
    sink: Box<dyn OutputSink>,
}

impl VirtualOutput {
    pub fn new(sink: Box<dyn OutputSink>) -> Self {
        Self { keystate: vec![false; KEY_CNT], sink }
    }

    pub fn is_pressed(&self, code: Keycode) -> bool {
        (code as usize) < self.keystate.len() && self.keystate[code as usize]
    }

    fn send_key(&mut self, code: Keycode, value: i32) {
        if code == KEY_NOOP {
            return;
        }
        if (code as usize) < self.keystate.len() {
            self.keystate[code as usize] = value != 0;
        }
        self.sink.write_key(code, value);
    }

    pub fn press(&mut self, code: Keycode) {
        self.send_key(code, 1);
    }

    pub fn release(&mut self, code: Keycode) {
        self.send_key(code, 0);
    }

    /// Forwards a relative-axis or mouse-button event verbatim to the virtual pointer.
    pub fn passthrough(&mut self, event: RawEvent) {
        self.sink.forward(event);
    }

    /// Rebroadcasts a `value = 2` auto-repeat for every keycode currently marked pressed.
    pub fn replay_repeats(&mut self) {
        for code in 0..self.keystate.len() {
            if self.keystate[code] {
                self.sink.write_key(code as Keycode, 2);
            }
        }
    }

    /// Brings the virtual keyboard's pressed-modifier set into agreement with `target`,
    /// emitting the minimal set of press/release events (§4.2).
    pub fn reify(&mut self, target: ModifierMask) {
        for &m in ALL_MODIFIERS.iter() {
            let want = target.contains(m);
            let key = canonical_keycode(m);
            if want != self.is_pressed(key) {
                self.send_key(key, want as i32);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keycodes;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct RecordingSink {
        key_events: Vec<(Keycode, i32)>,
        forwarded: Vec<RawEvent>,
    }

    struct SharedSink(Rc<RefCell<RecordingSink>>);

    impl OutputSink for SharedSink {
        fn write_key(&mut self, code: Keycode, value: i32) {
            self.0.borrow_mut().key_events.push((code, value));
        }
        fn forward(&mut self, event: RawEvent) {
            self.0.borrow_mut().forwarded.push(event);
        }
    }

    fn harness() -> (VirtualOutput, Rc<RefCell<RecordingSink>>) {
        let shared = Rc::new(RefCell::new(RecordingSink::default()));
        let out = VirtualOutput::new(Box::new(SharedSink(shared.clone())));
        (out, shared)
    }

    #[test]
    fn press_then_release_nets_zero() {
        let (mut out, sink) = harness();
        out.press(keycodes::A);
        out.release(keycodes::A);
        assert_eq!(sink.borrow().key_events, vec![(keycodes::A, 1), (keycodes::A, 0)]);
        assert!(!out.is_pressed(keycodes::A));
    }

    #[test]
    fn key_noop_is_never_written() {
        let (mut out, sink) = harness();
        out.press(keycodes::KEY_NOOP);
        out.release(keycodes::KEY_NOOP);
        assert!(sink.borrow().key_events.is_empty());
    }

    #[test]
    fn reify_emits_only_for_disagreeing_modifiers() {
        let (mut out, sink) = harness();
        out.reify(ModifierMask::CTRL);
        assert_eq!(sink.borrow().key_events, vec![(keycodes::LEFTCTRL, 1)]);

        sink.borrow_mut().key_events.clear();
        out.reify(ModifierMask::CTRL); // already satisfied, no-op
        assert!(sink.borrow().key_events.is_empty());

        out.reify(ModifierMask::empty());
        assert_eq!(sink.borrow().key_events, vec![(keycodes::LEFTCTRL, 0)]);
    }

    #[test]
    fn replay_repeats_only_for_held_keys() {
        let (mut out, sink) = harness();
        out.press(keycodes::A);
        sink.borrow_mut().key_events.clear();
        out.replay_repeats();
        assert_eq!(sink.borrow().key_events, vec![(keycodes::A, 2)]);
    }

    #[test]
    fn passthrough_forwards_to_sink_untouched() {
        let (mut out, sink) = harness();
        let ev = RawEvent::Relative { axis: 0, value: 5 };
        out.passthrough(ev);
        assert_eq!(sink.borrow().forwarded, vec![ev]);
    }
}
