//! Credential resolution for provider families
//!
//! A family's key comes from the user's saved credentials first and from the
//! built-in default table second. Built-in defaults are placeholders, so a
//! resolved key must still pass [is_usable_key] before it is sent anywhere.

pub mod resolver;

pub use resolver::{AuthResolver, CredentialResolver, DefaultKeyResolver, SavedKeyResolver};

/// Marker carried by every shipped placeholder key.
pub const PLACEHOLDER_MARKER: &str = "your-default";

/// Built-in default keys, one per credential slot.
pub const DEFAULT_KEYS: &[(&str, &str)] = &[
  ("openai", "sk-your-default-openai-key"),
  ("gemini", "your-default-gemini-key"),
  ("gemini_image", "your-default-gemini-image-key"),
  ("anthropic", "your-default-anthropic-key"),
  ("perplexity", "your-default-perplexity-key"),
  ("grok", "your-default-grok-key"),
];

/// Built-in default for `slot`.
pub fn default_key(slot: &str) -> Option<&'static str> {
  DEFAULT_KEYS
    .iter()
    .find(|(name, _)| *name == slot)
    .map(|(_, key)| *key)
}

/// A key is usable when it is non-empty and is not a shipped placeholder.
pub fn is_usable_key(key: &str) -> bool {
  !key.is_empty() && !key.contains(PLACEHOLDER_MARKER)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn placeholders_are_not_usable() {
    for (_, key) in DEFAULT_KEYS {
      assert!(!is_usable_key(key), "{key} should be rejected");
    }
    assert!(!is_usable_key(""));
    assert!(is_usable_key("sk-live-abc123"));
  }

  #[test]
  fn default_key_by_slot() {
    assert_eq!(default_key("grok"), Some("your-default-grok-key"));
    assert_eq!(default_key("mistral"), None);
  }
}
