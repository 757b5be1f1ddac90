// Chorus Preferences
// Flat preference record backed by preferences.json

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::blueprint::NO_TEMPLATE;
use crate::document::JsonDocument;
use crate::error::{Result, StateError};

pub const DEFAULT_THEME: &str = "Azure Sky";
pub const DEFAULT_MINDSET: &str = "Neutral";

/// User preferences. Missing fields take their defaults on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: String,
    pub use_default_keys: bool,
    pub active_template: String,
    pub remember_messages: bool,
    pub ai_mindset_preset: String,
    pub ai_mindset_custom: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            use_default_keys: true,
            active_template: NO_TEMPLATE.to_string(),
            remember_messages: true,
            ai_mindset_preset: DEFAULT_MINDSET.to_string(),
            ai_mindset_custom: String::new(),
        }
    }
}

impl Preferences {
    /// Set a field by its JSON name.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "theme" => self.theme = value.to_string(),
            "use_default_keys" => self.use_default_keys = parse_bool(key, value)?,
            "active_template" => self.active_template = value.to_string(),
            "remember_messages" => self.remember_messages = parse_bool(key, value)?,
            "ai_mindset_preset" => self.ai_mindset_preset = value.to_string(),
            "ai_mindset_custom" => self.ai_mindset_custom = value.to_string(),
            _ => return Err(StateError::UnknownPreference(key.to_string())),
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value.parse().map_err(|_| StateError::InvalidPreference {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Preferences plus their backing file. Every mutation is flushed.
pub struct PreferencesStore {
    doc: JsonDocument<Preferences>,
    prefs: Preferences,
}

impl PreferencesStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let doc = JsonDocument::new(path);
        let prefs = doc.load_or_create(Preferences::default)?;
        Ok(Self { doc, prefs })
    }

    pub fn get(&self) -> &Preferences {
        &self.prefs
    }

    /// Mutate and persist.
    pub fn update(&mut self, f: impl FnOnce(&mut Preferences)) -> Result<()> {
        f(&mut self.prefs);
        self.doc.save(&self.prefs)
    }

    /// `key=value` style update used by the CLI.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.prefs.apply(key, value)?;
        self.doc.save(&self.prefs)
    }
}
