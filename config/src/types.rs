// Configuration Types
// All configuration type definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Where the JSON documents live
  pub storage: StorageConfig,
  /// Outbound HTTP settings
  pub network: NetworkConfig,
  /// Orchestrator limits
  pub dispatch: DispatchConfig,
  /// Per-family endpoint overrides, keyed by family name (`openai`, `gemini`, ...)
  pub providers: BTreeMap<String, ProviderSettings>,
}

impl Config {
  /// Base URL override for `family`, if configured
  pub fn provider_base_url(&self, family: &str) -> Option<&str> {
    self
      .providers
      .get(family)
      .and_then(|p| p.base_url.as_deref())
  }
}

// ============================================================================
// STORAGE
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
  /// Data directory. `None` means `~/.chorus`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data_dir: Option<PathBuf>,
}

// ============================================================================
// NETWORK
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
  /// Per-request timeout for provider calls
  pub request_timeout_secs: u64,
  /// Timeout for the translation endpoint
  pub translate_timeout_secs: u64,
}

impl Default for NetworkConfig {
  fn default() -> Self {
    Self {
      request_timeout_secs: 60,
      translate_timeout_secs: 30,
    }
  }
}

// ============================================================================
// DISPATCH
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
  /// Remembered replies replayed as context
  pub history_limit: usize,
  /// Memory log entries kept on disk
  pub memory_capacity: usize,
  /// Images one turn may carry
  pub max_attachments: usize,
  /// Delay between revealed words
  pub reveal_interval_ms: u64,
}

impl Default for DispatchConfig {
  fn default() -> Self {
    Self {
      history_limit: 10,
      memory_capacity: 500,
      max_attachments: 20,
      reveal_interval_ms: 35,
    }
  }
}

// ============================================================================
// PROVIDERS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub base_url: Option<String>,
}
