//! The on-disk shape of a keyboard profile, deserialized by `serde`/`toml` before being
//! lowered into the core's `LayerSet` by `config::build_profile`.

use crate::modifier::ModifierMask;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub struct RawProfile {
    pub name: String,
    pub layout: String,
    pub modlayout: String,
    #[serde(default)]
    pub layer: Vec<RawLayer>,
}

#[derive(Debug, Deserialize)]
pub struct RawLayer {
    pub name: String,
    #[serde(default)]
    pub mods: Vec<RawModifier>,
    #[serde(default, rename = "map")]
    pub map: BTreeMap<String, String>,
}

impl RawLayer {
    pub fn mods(&self) -> ModifierMask {
        self.mods.iter().fold(ModifierMask::empty(), |acc, m| acc | m.as_mask())
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum RawModifier {
    Ctrl,
    Shift,
    Super,
    Alt,
    AltGr,
}

impl RawModifier {
    fn as_mask(self) -> ModifierMask {
        match self {
            RawModifier::Ctrl => ModifierMask::CTRL,
            RawModifier::Shift => ModifierMask::SHIFT,
            RawModifier::Super => ModifierMask::SUPER,
            RawModifier::Alt => ModifierMask::ALT,
            RawModifier::AltGr => ModifierMask::ALT_GR,
        }
    }
}
