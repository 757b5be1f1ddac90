//! Authentication resolvers
//!
//! Resolvers are tried in order; the first one that yields a key wins.

use std::collections::HashMap;

use super::default_key;

/// Source of a key for a credential slot.
pub trait AuthResolver: Send + Sync {
  /// Key for `slot`, or `None` when this source has nothing.
  fn resolve(&self, slot: &str) -> Option<String>;

  /// Resolver name, for logs.
  fn name(&self) -> &'static str;
}

/// Keys the user saved through configuration.
pub struct SavedKeyResolver {
  keys: HashMap<String, String>,
}

impl SavedKeyResolver {
  pub fn new(keys: HashMap<String, String>) -> Self {
    Self { keys }
  }
}

impl AuthResolver for SavedKeyResolver {
  fn resolve(&self, slot: &str) -> Option<String> {
    self
      .keys
      .get(slot)
      .filter(|key| !key.is_empty())
      .cloned()
  }

  fn name(&self) -> &'static str {
    "saved"
  }
}

/// Built-in default table.
pub struct DefaultKeyResolver;

impl AuthResolver for DefaultKeyResolver {
  fn resolve(&self, slot: &str) -> Option<String> {
    default_key(slot).map(str::to_string)
  }

  fn name(&self) -> &'static str {
    "default"
  }
}

/// Saved keys, then defaults when the user allows them.
pub struct CredentialResolver {
  saved: SavedKeyResolver,
  defaults: DefaultKeyResolver,
  use_default_keys: bool,
}

impl CredentialResolver {
  /// `use_default_keys` mirrors the preference of the same name.
  pub fn new(saved: HashMap<String, String>, use_default_keys: bool) -> Self {
    Self {
      saved: SavedKeyResolver::new(saved),
      defaults: DefaultKeyResolver,
      use_default_keys,
    }
  }

  /// Key for `slot`, or an empty string when nothing applies.
  ///
  /// `allow_default` lets a single call site opt out of built-in defaults
  /// even when the preference allows them.
  pub fn resolve(&self, slot: &str, allow_default: bool) -> String {
    let mut chain: Vec<&dyn AuthResolver> = vec![&self.saved];
    if allow_default && self.use_default_keys {
      chain.push(&self.defaults);
    }

    for resolver in chain {
      tracing::debug!("Trying resolver {} for {}", resolver.name(), slot);
      if let Some(key) = resolver.resolve(slot) {
        return key;
      }
    }

    String::new()
  }
}
