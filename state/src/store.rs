// Chorus State Store
// The four documents of one data directory

use std::path::{Path, PathBuf};

use crate::blueprint::{BlueprintBook, NO_TEMPLATE};
use crate::credentials::CredentialStore;
use crate::error::{Result, StateError};
use crate::memory::MemoryLog;
use crate::preferences::PreferencesStore;
use crate::{API_KEYS_FILE, CHAT_MEMORY_FILE, PREFERENCES_FILE, TEMPLATES_FILE};

/// Credentials, preferences, blueprints and memory log.
///
/// No cross-document transactions: each document is saved on its own.
pub struct StateStore {
    data_dir: PathBuf,
    pub credentials: CredentialStore,
    pub preferences: PreferencesStore,
    pub blueprints: BlueprintBook,
    pub memory: MemoryLog,
}

impl StateStore {
    /// Open every document under `data_dir`, creating missing ones.
    pub fn open(data_dir: impl AsRef<Path>, memory_capacity: usize) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;
        tracing::debug!("Opening state in {}", data_dir.display());

        Ok(Self {
            credentials: CredentialStore::open(data_dir.join(API_KEYS_FILE))?,
            preferences: PreferencesStore::open(data_dir.join(PREFERENCES_FILE))?,
            blueprints: BlueprintBook::open(data_dir.join(TEMPLATES_FILE))?,
            memory: MemoryLog::open(data_dir.join(CHAT_MEMORY_FILE), memory_capacity)?,
            data_dir,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Delete a blueprint, resetting the active one if it was removed.
    pub fn delete_blueprint(&mut self, name: &str) -> Result<()> {
        self.blueprints.delete(name)?;
        if self.preferences.get().active_template == name {
            self.preferences
                .update(|p| p.active_template = NO_TEMPLATE.to_string())?;
        }
        Ok(())
    }

    /// Record `name` as the active blueprint.
    pub fn set_active_blueprint(&mut self, name: &str) -> Result<()> {
        if !self.blueprints.contains(name) {
            return Err(StateError::UnknownBlueprint(name.to_string()));
        }
        self.preferences
            .update(|p| p.active_template = name.to_string())
    }
}
