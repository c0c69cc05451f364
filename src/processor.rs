//! The action dispatcher / event processor (§4.4–4.5): the state machine that consumes raw
//! input events, caches the chosen descriptor across the up/down pair, mutates layer
//! activations, and drives the virtual output.
//!
//! One `Processor` exists per device session (§4.6); its fields are exactly the "static
//! per-function locals" the design notes call out for promotion to object state
//! (`lastd`, `oneshot_layers`, `pressed_timestamps`, `last_keyseq_timestamp`).

use crate::keyboard::Keyboard;
use crate::keycodes::{is_mouse_button, Keycode, KEY_CNT};
use crate::keymap::{Descriptor, MacroStep};
use crate::modifier::ModifierMask;
use crate::output::{RawEvent, VirtualOutput};
use std::time::Duration;

/// Default tapping term for TAP_HOLD, per §4.5 and the glossary.
pub const DEFAULT_TAPPING_TERM_MS: u64 = 200;

/// A stable identity for "the descriptor dispatched by this event", standing in for the C
/// original's descriptor pointer comparison (`lastd == d`). Two events dispatch the same
/// descriptor iff they resolved to the same layer and the same keycode — sound because
/// layers are immutable after construction (DESIGN.md, Open Question 4).
type DescriptorId = (usize, Keycode);

#[derive(Clone, Copy)]
struct CacheEntry {
    layer_index: usize,
    mods: ModifierMask,
}

/// What happens after a dispatched action: whether the cleanup path runs (disarming
/// one-shots and stamping `last_keyseq_time` on press).
enum Flow {
    Normal,
    Cleanup,
}

pub struct Processor {
    cache: Vec<Option<CacheEntry>>,
    pressed_at: Vec<u64>,
    oneshot_armed: Vec<bool>,
    lastd: Option<DescriptorId>,
    last_keyseq_time: u64,
    tapping_term: Duration,
}

impl Processor {
    pub fn new(kbd: &Keyboard) -> Self {
        Self {
            cache: vec![None; KEY_CNT],
            pressed_at: vec![0; KEY_CNT],
            oneshot_armed: vec![false; kbd.layers().len()],
            lastd: None,
            last_keyseq_time: 0,
            tapping_term: Duration::from_millis(DEFAULT_TAPPING_TERM_MS),
        }
    }

    pub fn with_tapping_term(mut self, term: Duration) -> Self {
        self.tapping_term = term;
        self
    }

    /// The common frame of §4.4: routes non-key and mouse-button events to passthrough,
    /// auto-repeat to the replay path, and everything else to the keyed dispatch below.
    pub fn process_event(&mut self, kbd: &Keyboard, out: &mut VirtualOutput, event: RawEvent, now_ms: u64) {
        match event {
            RawEvent::Key { code, value } if is_mouse_button(code) => {
                out.passthrough(RawEvent::Key { code, value });
            }
            RawEvent::Key { value: 2, .. } => {
                out.replay_repeats();
            }
            RawEvent::Key { code, value } => {
                self.process_key(kbd, out, code, value == 1, now_ms);
            }
            other => out.passthrough(other),
        }
    }

    fn process_key(&mut self, kbd: &Keyboard, out: &mut VirtualOutput, code: Keycode, pressed: bool, now_ms: u64) {
        let idx = code as usize;

        let resolved: Option<CacheEntry> = if pressed {
            self.pressed_at[idx] = now_ms;
            let entry = crate::resolver::resolve(kbd, code)
                .map(|r| CacheEntry { layer_index: r.layer_index, mods: r.mods });
            self.cache[idx] = entry;
            entry
        } else {
            self.cache[idx].take()
        };

        let Some(entry) = resolved else {
            self.cleanup(kbd, None, pressed, now_ms);
            return;
        };

        let id: DescriptorId = (entry.layer_index, code);
        let descriptor = kbd.layers()[entry.layer_index].descriptor(code).clone();

        let flow = self.dispatch(kbd, out, code, pressed, now_ms, entry.mods, &descriptor, id);
        match flow {
            Flow::Cleanup => self.cleanup(kbd, Some(id), pressed, now_ms),
            Flow::Normal => self.lastd = Some(id),
        }
    }

    fn cleanup(&mut self, kbd: &Keyboard, id: Option<DescriptorId>, pressed: bool, now_ms: u64) {
        self.lastd = id;
        if pressed {
            self.last_keyseq_time = now_ms;
        }
        for (index, armed) in self.oneshot_armed.iter_mut().enumerate() {
            if *armed {
                kbd.layers()[index].set_active(false);
                *armed = false;
            }
        }
    }

    fn dispatch(
        &mut self,
        kbd: &Keyboard,
        out: &mut VirtualOutput,
        code: Keycode,
        pressed: bool,
        now_ms: u64,
        mods: ModifierMask,
        descriptor: &Descriptor,
        id: DescriptorId,
    ) -> Flow {
        match descriptor {
            Descriptor::Undefined => Flow::Cleanup,

            Descriptor::KeySeq(seq) => {
                if pressed {
                    out.reify(mods | seq.mods);
                    if out.is_pressed(seq.key) {
                        out.release(seq.key);
                    }
                    out.press(seq.key);
                } else {
                    out.reify(kbd.active_mods_union());
                    out.release(seq.key);
                }
                Flow::Cleanup
            }

            Descriptor::Macro(steps) => {
                if pressed {
                    self.run_macro(out, steps);
                    out.reify(kbd.active_mods_union());
                    Flow::Cleanup
                } else {
                    Flow::Normal
                }
            }

            Descriptor::Layer(layer_index) => {
                let layer = &kbd.layers()[*layer_index];
                if pressed {
                    layer.toggle_and_stamp(now_ms);
                } else {
                    layer.toggle_active();
                }
                out.reify(kbd.active_mods_union());
                Flow::Normal
            }

            Descriptor::LayerToggle(layer_index) => {
                if pressed {
                    Flow::Normal
                } else {
                    let layer = &kbd.layers()[*layer_index];
                    if self.oneshot_armed[*layer_index] {
                        self.oneshot_armed[*layer_index] = false;
                    } else {
                        layer.toggle_active();
                    }
                    out.reify(kbd.active_mods_union());
                    Flow::Cleanup
                }
            }

            Descriptor::OneShot(layer_index) => {
                let layer = &kbd.layers()[*layer_index];
                if pressed {
                    layer.activate(now_ms);
                } else if self.pressed_at[code as usize] < self.last_keyseq_time {
                    layer.toggle_active();
                } else {
                    self.oneshot_armed[*layer_index] = true;
                }
                out.reify(kbd.active_mods_union());
                Flow::Normal
            }

            Descriptor::Overload(seq, layer_index) => {
                self.dispatch_overload(kbd, out, pressed, now_ms, mods, *seq, *layer_index, id, None)
            }

            Descriptor::TapHold(seq, layer_index) => {
                self.dispatch_overload(kbd, out, pressed, now_ms, mods, *seq, *layer_index, id, Some(self.tapping_term))
            }

            Descriptor::Layout(layout, modlayout) => {
                kbd.set_layout(*layout, *modlayout);
                Flow::Normal
            }
        }
    }

    /// OVERLOAD and TAP_HOLD share this shape; `tapping_term_gate` is `None` for OVERLOAD
    /// (no time gate) and `Some(term)` for TAP_HOLD (tap suppressed outside the term).
    #[allow(clippy::too_many_arguments)]
    fn dispatch_overload(
        &mut self,
        kbd: &Keyboard,
        out: &mut VirtualOutput,
        pressed: bool,
        now_ms: u64,
        mods: ModifierMask,
        seq: crate::keymap::KeySequence,
        layer_index: usize,
        id: DescriptorId,
        tapping_term_gate: Option<Duration>,
    ) -> Flow {
        let layer = &kbd.layers()[layer_index];

        if pressed {
            layer.toggle_and_stamp(now_ms);
            out.reify(kbd.active_mods_union());
            return Flow::Normal;
        }

        layer.toggle_active();

        let tapped = self.lastd == Some(id)
            && tapping_term_gate
                .map(|term| {
                    let elapsed = now_ms.saturating_sub(layer.timestamp());
                    elapsed <= term.as_millis() as u64
                })
                .unwrap_or(true);

        if tapped {
            out.reify(mods | seq.mods);
            out.press(seq.key);
            out.release(seq.key);
            self.last_keyseq_time = now_ms;
            Flow::Cleanup
        } else {
            out.reify(kbd.active_mods_union());
            Flow::Normal
        }
    }

    fn run_macro(&self, out: &mut VirtualOutput, steps: &[MacroStep]) {
        for step in steps {
            match step {
                MacroStep::Timeout(ms) => std::thread::sleep(Duration::from_millis(*ms as u64)),
                MacroStep::Tap(seq) => {
                    out.reify(seq.mods);
                    out.press(seq.key);
                    out.release(seq.key);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::Keyboard;
    use crate::keycodes;
    use crate::keymap::{KeySequence, Layer, LayerSet};
    use crate::output::OutputSink;
    use std::sync::Arc;

    #[derive(Default)]
    struct Log(Vec<String>);

    struct LoggingSink(std::rc::Rc<std::cell::RefCell<Log>>);

    impl OutputSink for LoggingSink {
        fn write_key(&mut self, code: Keycode, value: i32) {
            let name = keycodes::name_for(code).unwrap_or("?");
            let tag = match value {
                0 => "-",
                1 => "+",
                _ => "~",
            };
            self.0.borrow_mut().0.push(format!("{tag}{name}"));
        }
        fn forward(&mut self, _event: RawEvent) {}
    }

    fn harness(kbd: &Keyboard) -> (Processor, VirtualOutput, std::rc::Rc<std::cell::RefCell<Log>>) {
        let log = std::rc::Rc::new(std::cell::RefCell::new(Log::default()));
        let out = VirtualOutput::new(Box::new(LoggingSink(log.clone())));
        (Processor::new(kbd), out, log)
    }

    fn press(p: &mut Processor, kbd: &Keyboard, out: &mut VirtualOutput, code: Keycode, t: u64) {
        p.process_event(kbd, out, RawEvent::Key { code, value: 1 }, t);
    }
    fn release(p: &mut Processor, kbd: &Keyboard, out: &mut VirtualOutput, code: Keycode, t: u64) {
        p.process_event(kbd, out, RawEvent::Key { code, value: 0 }, t);
    }

    /// Scenario 1: plain remap, CAPSLOCK -> ESC.
    #[test]
    fn scenario_plain_remap() {
        let mut main = Layer::new("main", ModifierMask::empty());
        main.bind(keycodes::CAPSLOCK, Descriptor::KeySeq(KeySequence::bare(keycodes::ESC)));
        let kbd = Keyboard::new(Arc::new(LayerSet::new(vec![main])), 0, 0);
        let (mut p, mut out, log) = harness(&kbd);

        press(&mut p, &kbd, &mut out, keycodes::CAPSLOCK, 0);
        release(&mut p, &kbd, &mut out, keycodes::CAPSLOCK, 10);

        assert_eq!(log.borrow().0, vec!["+esc", "-esc"]);
    }

    /// Scenario 2/3: OVERLOAD tapped vs. held.
    fn overload_kbd() -> Keyboard {
        let mut main = Layer::new("main", ModifierMask::empty());
        main.bind(
            keycodes::CAPSLOCK,
            Descriptor::Overload(KeySequence::bare(keycodes::ESC), 1),
        );
        let mut nav = Layer::new("nav", ModifierMask::empty());
        nav.bind(keycodes::H, Descriptor::KeySeq(KeySequence::bare(keycodes::LEFT)));
        Keyboard::new(Arc::new(LayerSet::new(vec![main, nav])), 0, 0)
    }

    #[test]
    fn scenario_overload_tapped() {
        let kbd = overload_kbd();
        let (mut p, mut out, log) = harness(&kbd);

        press(&mut p, &kbd, &mut out, keycodes::CAPSLOCK, 0);
        release(&mut p, &kbd, &mut out, keycodes::CAPSLOCK, 10);

        assert_eq!(log.borrow().0, vec!["+esc", "-esc"]);
        assert!(!kbd.layers()[1].is_active());
    }

    #[test]
    fn scenario_overload_held() {
        let kbd = overload_kbd();
        let (mut p, mut out, log) = harness(&kbd);

        press(&mut p, &kbd, &mut out, keycodes::CAPSLOCK, 0);
        press(&mut p, &kbd, &mut out, keycodes::H, 10);
        release(&mut p, &kbd, &mut out, keycodes::H, 20);
        release(&mut p, &kbd, &mut out, keycodes::CAPSLOCK, 30);

        assert_eq!(log.borrow().0, vec!["+left", "-left"]);
        assert!(!kbd.layers()[1].is_active());
    }

    /// Scenario 4: TAP_HOLD timing gate.
    #[test]
    fn scenario_tap_hold_within_term_emits_tap() {
        let mut main = Layer::new("main", ModifierMask::empty());
        main.bind(keycodes::A, Descriptor::TapHold(KeySequence::bare(keycodes::A), 1));
        let sym = Layer::new("sym", ModifierMask::empty());
        let kbd = Keyboard::new(Arc::new(LayerSet::new(vec![main, sym])), 0, 0);
        let (mut p, mut out, log) = harness(&kbd);

        press(&mut p, &kbd, &mut out, keycodes::A, 0);
        release(&mut p, &kbd, &mut out, keycodes::A, 100);

        assert_eq!(log.borrow().0, vec!["+a", "-a"]);
    }

    #[test]
    fn scenario_tap_hold_beyond_term_emits_nothing() {
        let mut main = Layer::new("main", ModifierMask::empty());
        main.bind(keycodes::A, Descriptor::TapHold(KeySequence::bare(keycodes::A), 1));
        let sym = Layer::new("sym", ModifierMask::empty());
        let kbd = Keyboard::new(Arc::new(LayerSet::new(vec![main, sym])), 0, 0);
        let (mut p, mut out, log) = harness(&kbd);

        press(&mut p, &kbd, &mut out, keycodes::A, 0);
        release(&mut p, &kbd, &mut out, keycodes::A, 400);

        assert!(log.borrow().0.is_empty());
    }

    /// Scenario 5: one-shot used vs. unused.
    #[test]
    fn scenario_oneshot_used_then_disarmed() {
        let mut main = Layer::new("main", ModifierMask::empty());
        main.bind(keycodes::LEFTSHIFT, Descriptor::OneShot(1));
        main.bind(keycodes::A, Descriptor::KeySeq(KeySequence::bare(keycodes::A)));
        main.bind(keycodes::B, Descriptor::KeySeq(KeySequence::bare(keycodes::B)));
        let mut shift_layer = Layer::new("shift_layer", ModifierMask::SHIFT);
        shift_layer.bind(keycodes::A, Descriptor::KeySeq(KeySequence::bare(keycodes::LEFTBRACE)));
        let kbd = Keyboard::new(Arc::new(LayerSet::new(vec![main, shift_layer])), 0, 0);
        let (mut p, mut out, log) = harness(&kbd);

        press(&mut p, &kbd, &mut out, keycodes::LEFTSHIFT, 0);
        release(&mut p, &kbd, &mut out, keycodes::LEFTSHIFT, 5);
        assert!(kbd.layers()[1].is_active(), "one-shot stays active once armed");

        press(&mut p, &kbd, &mut out, keycodes::A, 10);
        release(&mut p, &kbd, &mut out, keycodes::A, 15);
        assert!(!kbd.layers()[1].is_active(), "cleanup disarms the one-shot");

        log.borrow_mut().0.clear();
        press(&mut p, &kbd, &mut out, keycodes::B, 20);
        release(&mut p, &kbd, &mut out, keycodes::B, 25);
        assert_eq!(log.borrow().0, vec!["+b", "-b"]);
    }

    /// Scenario 6: modifier composition across two active layers.
    #[test]
    fn scenario_modifier_composition() {
        let mut nav = Layer::new("nav", ModifierMask::empty());
        nav.bind(keycodes::H, Descriptor::KeySeq(KeySequence::bare(keycodes::LEFT)));
        let mods = Layer::new("mods", ModifierMask::CTRL);
        let layout = Layer::new("layout", ModifierMask::empty());
        let kbd = Keyboard::new(Arc::new(LayerSet::new(vec![layout, nav, mods])), 0, 0);
        kbd.layers()[1].activate(1);
        kbd.layers()[2].activate(2);

        let (mut p, mut out, log) = harness(&kbd);
        press(&mut p, &kbd, &mut out, keycodes::H, 10);
        release(&mut p, &kbd, &mut out, keycodes::H, 20);

        assert_eq!(log.borrow().0, vec!["+leftcontrol", "+left", "-left"]);
    }

    /// Round-trip: UNDEFINED leaves keystate and one-shots untouched.
    #[test]
    fn undefined_action_is_idempotent() {
        let main = Layer::new("main", ModifierMask::empty());
        let kbd = Keyboard::new(Arc::new(LayerSet::new(vec![main])), 0, 0);
        let (mut p, mut out, log) = harness(&kbd);

        press(&mut p, &kbd, &mut out, keycodes::F1, 0);
        release(&mut p, &kbd, &mut out, keycodes::F1, 5);

        assert!(log.borrow().0.is_empty());
    }

    /// Round-trip: LAYER press+release with nothing in between restores prior state.
    #[test]
    fn layer_press_release_round_trips() {
        let mut main = Layer::new("main", ModifierMask::empty());
        main.bind(keycodes::F1, Descriptor::Layer(1));
        let nav = Layer::new("nav", ModifierMask::empty());
        let kbd = Keyboard::new(Arc::new(LayerSet::new(vec![main, nav])), 0, 0);
        let (mut p, mut out, _log) = harness(&kbd);

        let before = kbd.layers()[1].is_active();
        press(&mut p, &kbd, &mut out, keycodes::F1, 0);
        release(&mut p, &kbd, &mut out, keycodes::F1, 5);
        assert_eq!(kbd.layers()[1].is_active(), before);
    }

    /// Round-trip: LAYER_TOGGLE applied twice returns to the original value.
    #[test]
    fn layer_toggle_twice_restores_original() {
        let mut main = Layer::new("main", ModifierMask::empty());
        main.bind(keycodes::F1, Descriptor::LayerToggle(1));
        let nav = Layer::new("nav", ModifierMask::empty());
        let kbd = Keyboard::new(Arc::new(LayerSet::new(vec![main, nav])), 0, 0);
        let (mut p, mut out, _log) = harness(&kbd);

        let before = kbd.layers()[1].is_active();
        press(&mut p, &kbd, &mut out, keycodes::F1, 0);
        release(&mut p, &kbd, &mut out, keycodes::F1, 5);
        press(&mut p, &kbd, &mut out, keycodes::F1, 10);
        release(&mut p, &kbd, &mut out, keycodes::F1, 15);
        assert_eq!(kbd.layers()[1].is_active(), before);
    }

    #[test]
    fn mouse_button_bypasses_dispatch_entirely() {
        let main = Layer::new("main", ModifierMask::empty());
        let kbd = Keyboard::new(Arc::new(LayerSet::new(vec![main])), 0, 0);
        let (mut p, mut out, log) = harness(&kbd);

        p.process_event(&kbd, &mut out, RawEvent::Key { code: keycodes::BTN_LEFT, value: 1 }, 0);
        assert!(log.borrow().0.is_empty());
    }

    #[test]
    fn keyseq_repress_releases_stale_variant_first() {
        let mut main = Layer::new("main", ModifierMask::empty());
        main.bind(keycodes::LEFTBRACE, Descriptor::KeySeq(KeySequence::bare(keycodes::LEFTBRACE)));
        let kbd = Keyboard::new(Arc::new(LayerSet::new(vec![main])), 0, 0);
        let (mut p, mut out, _log) = harness(&kbd);

        out.press(keycodes::LEFTBRACE); // simulate already-held stale variant
        press(&mut p, &kbd, &mut out, keycodes::LEFTBRACE, 0);
        assert!(out.is_pressed(keycodes::LEFTBRACE));
    }
}
