//! A small recursive-descent parser for descriptor expressions
//! (`"a"`, `"C-a"`, `"overload(esc, nav)"`, `"macro(hello, 250ms, world)"`, ...).
//!
//! This is the concrete stand-in for the "parser that converts user configuration text
//! into the in-memory keymap" collaborator the top-level spec names as explicitly out of
//! core scope (§1) — a real implementation, in the sense that it is not a stub, but its
//! grammar is not part of the specification and may be freely replaced.

use crate::keycodes::lookup_by_name;
use crate::keymap::{Descriptor, KeySequence, MacroStep};
use crate::modifier::ModifierMask;
use std::sync::Arc;

type IndexOf<'a> = dyn Fn(&str) -> Result<usize, crate::error::ConfigError> + 'a;

/// Parses a single descriptor expression against an already-known set of layer names,
/// resolved via `index_of`.
pub fn parse_descriptor(expr: &str, index_of: &dyn Fn(&str) -> Result<usize, crate::error::ConfigError>) -> Result<Descriptor, String> {
    let expr = expr.trim();

    if let Some(open) = expr.find('(') {
        if !expr.ends_with(')') {
            return Err(format!("unterminated function call in {expr:?}"));
        }
        let name = expr[..open].trim();
        let inner = &expr[open + 1..expr.len() - 1];
        let args = split_args(inner);
        return parse_call(name, &args, index_of);
    }

    parse_keyseq(expr).map(Descriptor::KeySeq)
}

fn parse_call(name: &str, args: &[String], index_of: &IndexOf<'_>) -> Result<Descriptor, String> {
    let layer = |i: usize| -> Result<usize, String> {
        let token = args.get(i).ok_or_else(|| format!("{name} missing argument {i}"))?;
        index_of(token.trim()).map_err(|e| e.to_string())
    };
    let keyseq_arg = |i: usize| -> Result<KeySequence, String> {
        let token = args.get(i).ok_or_else(|| format!("{name} missing argument {i}"))?;
        parse_keyseq(token.trim())
    };

    match name {
        "overload" => Ok(Descriptor::Overload(keyseq_arg(0)?, layer(1)?)),
        "taphold" => Ok(Descriptor::TapHold(keyseq_arg(0)?, layer(1)?)),
        "layer" => Ok(Descriptor::Layer(layer(0)?)),
        "layertoggle" => Ok(Descriptor::LayerToggle(layer(0)?)),
        "oneshot" => Ok(Descriptor::OneShot(layer(0)?)),
        "layout" => Ok(Descriptor::Layout(layer(0)?, layer(1)?)),
        "macro" => {
            let steps: Result<Vec<MacroStep>, String> = args.iter().map(|a| parse_macro_step(a.trim())).collect();
            Ok(Descriptor::Macro(Arc::from(steps?)))
        }
        other => Err(format!("unknown descriptor function {other:?}")),
    }
}

fn parse_macro_step(token: &str) -> Result<MacroStep, String> {
    if let Some(digits) = token.strip_suffix("ms") {
        let ms: u32 = digits.parse().map_err(|_| format!("bad timeout step {token:?}"))?;
        return Ok(MacroStep::Timeout(ms));
    }
    parse_keyseq(token).map(MacroStep::Tap)
}

/// Parses a bare or modifier-prefixed key token: `"a"`, `"C-a"`, `"C-S-left"`.
fn parse_keyseq(token: &str) -> Result<KeySequence, String> {
    let mut parts: Vec<&str> = token.split('-').collect();
    let key_part = parts.pop().ok_or_else(|| format!("empty key token {token:?}"))?;

    let mut mods = ModifierMask::empty();
    for prefix in parts {
        mods |= match prefix {
            "C" => ModifierMask::CTRL,
            "S" => ModifierMask::SHIFT,
            "M" => ModifierMask::SUPER,
            "A" => ModifierMask::ALT,
            "G" => ModifierMask::ALT_GR,
            other => return Err(format!("unknown modifier prefix {other:?} in {token:?}")),
        };
    }

    let key = lookup_by_name(key_part).ok_or_else(|| format!("unknown key name {key_part:?}"))?;
    Ok(KeySequence { mods, key })
}

fn split_args(inner: &str) -> Vec<String> {
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner.split(',').map(|s| s.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keycodes;

    fn index_of(name: &str) -> Result<usize, crate::error::ConfigError> {
        match name {
            "nav" => Ok(1),
            "sym" => Ok(2),
            "main" => Ok(0),
            other => Err(crate::error::ConfigError::UnknownLayer {
                path: "<test>".into(),
                name: other.to_string(),
            }),
        }
    }

    #[test]
    fn parses_bare_key() {
        let d = parse_descriptor("a", &index_of).unwrap();
        assert!(matches!(d, Descriptor::KeySeq(seq) if seq.key == keycodes::A && seq.mods.is_empty()));
    }

    #[test]
    fn parses_modifier_prefixed_key() {
        let d = parse_descriptor("C-S-a", &index_of).unwrap();
        let Descriptor::KeySeq(seq) = d else { panic!("expected keyseq") };
        assert_eq!(seq.key, keycodes::A);
        assert_eq!(seq.mods, ModifierMask::CTRL | ModifierMask::SHIFT);
    }

    #[test]
    fn parses_overload_call() {
        let d = parse_descriptor("overload(esc, nav)", &index_of).unwrap();
        assert!(matches!(d, Descriptor::Overload(seq, 1) if seq.key == keycodes::ESC));
    }

    #[test]
    fn parses_layout_call() {
        let d = parse_descriptor("layout(main, sym)", &index_of).unwrap();
        assert!(matches!(d, Descriptor::Layout(0, 2)));
    }

    #[test]
    fn parses_macro_with_timeout_step() {
        let d = parse_descriptor("macro(h, 250ms, i)", &index_of).unwrap();
        let Descriptor::Macro(steps) = d else { panic!("expected macro") };
        assert_eq!(steps.len(), 3);
        assert!(matches!(steps[1], MacroStep::Timeout(250)));
    }

    #[test]
    fn unknown_function_is_an_error() {
        assert!(parse_descriptor("bogus(a)", &index_of).is_err());
    }

    #[test]
    fn unknown_layer_reference_is_an_error() {
        assert!(parse_descriptor("layer(ghost)", &index_of).is_err());
    }
}
