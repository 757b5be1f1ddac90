// Layered Configuration
// TOML layers merged in precedence order

use serde::{Deserialize, Serialize};

/// Stack of TOML layers; later layers win
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayeredConfig {
  /// Configuration layers, lowest precedence first
  layers: Vec<ConfigLayer>,
}

/// One parsed TOML document and where it came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigLayer {
  pub source: ConfigLayerSource,
  pub values: toml::Value,
}

/// Where a layer was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigLayerSource {
  /// `Config::default()`
  Default,
  /// `~/.chorus/config.toml`
  GlobalConfig,
  /// `<project>/.chorus/config.toml`
  ProjectConfig,
}

impl LayeredConfig {
  pub fn new() -> Self {
    Self { layers: Vec::new() }
  }

  /// Push a layer above every existing one
  pub fn add_layer(&mut self, layer: ConfigLayer) {
    self.layers.push(layer);
  }

  /// Deep merge of every layer. Tables merge key by key; anything else is replaced.
  pub fn merge(&self) -> toml::Value {
    let mut merged = toml::Value::Table(toml::map::Map::new());
    for layer in &self.layers {
      Self::merge_values(&mut merged, &layer.values);
    }
    merged
  }

  fn merge_values(base: &mut toml::Value, overlay: &toml::Value) {
    match (base, overlay) {
      (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
        for (key, value) in overlay_table {
          match base_table.get_mut(key) {
            Some(existing) => Self::merge_values(existing, value),
            None => {
              base_table.insert(key.clone(), value.clone());
            }
          }
        }
      }
      (base, overlay) => *base = overlay.clone(),
    }
  }
}

impl Default for LayeredConfig {
  fn default() -> Self {
    Self::new()
  }
}
