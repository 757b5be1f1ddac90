// Chorus Credentials
// Slot -> API key map backed by api_keys.json

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::document::JsonDocument;
use crate::error::Result;

/// Known credential slots
pub const CREDENTIAL_SLOTS: &[&str] = &[
    "openai",
    "gemini",
    "gemini_image",
    "anthropic",
    "perplexity",
    "grok",
];

/// Saved API keys. Keys are opaque strings.
pub struct CredentialStore {
    doc: JsonDocument<BTreeMap<String, String>>,
    keys: BTreeMap<String, String>,
}

impl CredentialStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let doc = JsonDocument::new(path);
        let keys = doc.load_or_create(BTreeMap::new)?;
        Ok(Self { doc, keys })
    }

    pub fn get(&self, slot: &str) -> Option<&str> {
        self.keys.get(slot).map(String::as_str)
    }

    /// Store `key` for `slot` and persist. An empty key clears the slot's value.
    pub fn set(&mut self, slot: &str, key: &str) -> Result<()> {
        self.keys.insert(slot.to_string(), key.trim().to_string());
        self.doc.save(&self.keys)
    }

    /// Snapshot handed to the credential resolver.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.keys
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_persist_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api_keys.json");

        let mut store = CredentialStore::open(path.clone()).unwrap();
        store.set("grok", "  xai-123 ").unwrap();

        let reopened = CredentialStore::open(path).unwrap();
        assert_eq!(reopened.get("grok"), Some("xai-123"));
        assert_eq!(reopened.get("openai"), None);
    }
}
