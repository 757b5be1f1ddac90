// Chorus State
// JSON document persistence

pub mod blueprint;
pub mod credentials;
pub mod document;
pub mod error;
pub mod memory;
pub mod preferences;
pub mod store;

pub use blueprint::{BLUEPRINT_HEADER, BlueprintBook, NO_TEMPLATE};
pub use credentials::{CREDENTIAL_SLOTS, CredentialStore};
pub use document::JsonDocument;
pub use error::{Result, StateError};
pub use memory::{
    DEFAULT_MEMORY_CAPACITY, MemoryEntry, MemoryLog, MemorySummary, ModelReply, UserPrompt,
    timestamp_now,
};
pub use preferences::{Preferences, PreferencesStore};
pub use store::StateStore;

/// File names inside the data directory
pub const API_KEYS_FILE: &str = "api_keys.json";
pub const PREFERENCES_FILE: &str = "preferences.json";
pub const TEMPLATES_FILE: &str = "templates.json";
pub const CHAT_MEMORY_FILE: &str = "chat_memory.json";

/// Default data directory: `~/.chorus`
pub fn default_data_dir() -> std::path::PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    home.join(".chorus")
}
