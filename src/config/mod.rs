//! The config collaborator (SPEC_FULL §6a): loads TOML keyboard profiles from disk and
//! lowers them into the core's `Keyboard`/`LayerSet` types. Not part of the core's 1000-line
//! budget — the spec treats this as an external collaborator and only prescribes its
//! contract (§6), not its grammar.

pub mod model;
pub mod parser;

use crate::error::ConfigError;
use crate::keyboard::Keyboard;
use crate::keymap::{Layer, LayerSet};
use model::RawProfile;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One loaded keyboard profile: the device-name match (or `"default"`) plus the built
/// `Keyboard` (owning its own `Arc<LayerSet>`) ready to hand to a device session.
#[derive(Debug)]
pub struct Profile {
    pub device_name: String,
    pub keyboard: Arc<LayerSetProfile>,
}

/// A `LayerSet` plus the initial layout/modlayout indices, shared by every `Keyboard`
/// instance built from this profile (one per physical device matching `device_name`).
#[derive(Debug)]
pub struct LayerSetProfile {
    pub layers: Arc<LayerSet>,
    pub layout: usize,
    pub modlayout: usize,
}

impl LayerSetProfile {
    pub fn new_keyboard(&self) -> Keyboard {
        Keyboard::new(self.layers.clone(), self.layout, self.modlayout)
    }
}

/// Loads every `*.toml` file directly under `dir` as a profile.
pub fn load_dir(dir: &Path) -> Result<Vec<Profile>, ConfigError> {
    let mut profiles = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| ConfigError::Io { path: dir.to_path_buf(), source })?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("toml") {
            continue;
        }
        profiles.push(load_file(&path)?);
    }

    Ok(profiles)
}

/// Resolves the default config directory: `$XDG_CONFIG_HOME/keylayerd` if it exists,
/// otherwise the system-wide `/etc/keylayerd` fallback (for daemons launched by init with
/// no `$HOME`/`$XDG_CONFIG_HOME` in their environment).
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|d| d.join("keylayerd"))
        .filter(|p| p.exists())
        .or_else(|| Some(PathBuf::from("/etc/keylayerd")))
        .ok_or(ConfigError::NoConfigDir)
}

fn load_file(path: &Path) -> Result<Profile, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: RawProfile = toml::from_str(&text).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    build_profile(path, raw)
}

fn build_profile(path: &Path, raw: RawProfile) -> Result<Profile, ConfigError> {
    if raw.layer.is_empty() {
        return Err(ConfigError::EmptyProfile { path: path.to_path_buf() });
    }

    let mut names = std::collections::HashSet::new();
    for layer in &raw.layer {
        if !names.insert(layer.name.clone()) {
            return Err(ConfigError::DuplicateLayer { path: path.to_path_buf(), name: layer.name.clone() });
        }
    }

    // Pass 1: construct every layer (with its modifier mask) so cross-layer references
    // (layer/oneshot/overload/layout targets) can resolve to an index before any bindings
    // are parsed.
    let index_of = |name: &str| -> Result<usize, ConfigError> {
        raw.layer
            .iter()
            .position(|l| l.name == name)
            .ok_or_else(|| ConfigError::UnknownLayer { path: path.to_path_buf(), name: name.to_string() })
    };

    let mut layers: Vec<Layer> = raw
        .layer
        .iter()
        .map(|l| Layer::new(l.name.clone(), l.mods()))
        .collect();

    // Pass 2: parse and bind every descriptor expression now that indices are known.
    for (layer_index, raw_layer) in raw.layer.iter().enumerate() {
        for (key_name, expr) in &raw_layer.map {
            let code = crate::keycodes::lookup_by_name(key_name).ok_or_else(|| ConfigError::UnknownKeyName {
                path: path.to_path_buf(),
                name: key_name.clone(),
            })?;
            let descriptor = parser::parse_descriptor(expr, &index_of).map_err(|reason| ConfigError::BadDescriptor {
                path: path.to_path_buf(),
                expr: expr.clone(),
                reason,
            })?;
            layers[layer_index].bind(code, descriptor);
        }
    }

    let layout = index_of(&raw.layout)?;
    let modlayout = index_of(&raw.modlayout)?;

    Ok(Profile {
        device_name: raw.name,
        keyboard: Arc::new(LayerSetProfile { layers: Arc::new(LayerSet::new(layers)), layout, modlayout }),
    })
}

/// Picks the profile matching `device_name`, falling back to the one named `"default"`
/// (§6/§7: unknown-device handling). `None` means the device must be ignored.
pub fn select_profile<'a>(profiles: &'a [Profile], device_name: &str) -> Option<&'a Profile> {
    profiles
        .iter()
        .find(|p| p.device_name == device_name)
        .or_else(|| profiles.iter().find(|p| p.device_name == "default"))
}
