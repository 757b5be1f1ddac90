// Chorus JSON Document
// One JSON file, loaded or created with its default and saved atomically

use std::fs::{self, File};
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Handle to a whole-file JSON document.
///
/// Saves write a sibling temp file, fsync it, then rename over the target, so
/// readers only ever see the old or the new content.
#[derive(Debug, Clone)]
pub struct JsonDocument<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document, creating it from `default` when absent.
    ///
    /// A file that cannot be read or parsed yields `default` and a warning.
    /// The broken file is moved to `<name>.corrupt` so a later save cannot
    /// overwrite it.
    pub fn load_or_create(&self, default: impl FnOnce() -> T) -> Result<T> {
        if !self.path.exists() {
            let value = default();
            self.save(&value)?;
            return Ok(value);
        }

        let parsed = fs::read_to_string(&self.path)
            .map_err(|e| e.to_string())
            .and_then(|content| serde_json::from_str::<T>(&content).map_err(|e| e.to_string()));

        match parsed {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!("Unreadable {}, using defaults: {}", self.path.display(), e);
                let aside = self.sibling_path("corrupt");
                if let Err(e) = fs::rename(&self.path, &aside) {
                    tracing::warn!("Could not move {} aside: {}", self.path.display(), e);
                }
                Ok(default())
            }
        }
    }

    /// Overwrite the whole file.
    pub fn save(&self, value: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(value)?;

        let tmp_path = self.sibling_path("tmp");
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// `<name>.<suffix>` next to the document
    fn sibling_path(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(suffix);
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn missing_file_is_created_with_default() {
        let dir = tempfile::tempdir().unwrap();
        let doc: JsonDocument<BTreeMap<String, String>> =
            JsonDocument::new(dir.path().join("nested").join("keys.json"));

        let value = doc.load_or_create(BTreeMap::new).unwrap();
        assert!(value.is_empty());
        assert_eq!(fs::read_to_string(doc.path()).unwrap().trim(), "{}");
    }

    #[test]
    fn corrupt_file_reads_as_default_and_survives_the_next_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        fs::write(&path, "[{not json").unwrap();

        let doc: JsonDocument<Vec<u32>> = JsonDocument::new(path.clone());
        assert_eq!(doc.load_or_create(|| vec![7]).unwrap(), vec![7]);

        doc.save(&vec![8]).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("memory.json.corrupt")).unwrap(),
            "[{not json"
        );
        assert_eq!(doc.load_or_create(Vec::new).unwrap(), vec![8]);
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let doc: JsonDocument<Vec<u32>> = JsonDocument::new(dir.path().join("v.json"));
        doc.save(&vec![1, 2, 3]).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("v.json")]);
        assert_eq!(doc.load_or_create(Vec::new).unwrap(), vec![1, 2, 3]);
    }
}
