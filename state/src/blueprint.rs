// Chorus Blueprint Book
// Named instruction blocks backed by templates.json

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::document::JsonDocument;
use crate::error::{Result, StateError};

/// The always-present, never-deletable, empty blueprint.
pub const NO_TEMPLATE: &str = "No Template";

/// Header placed between the prompt and active blueprint text.
pub const BLUEPRINT_HEADER: &str = "--- INSTRUCTIONS FROM BLUEPRINTS ---";

pub struct BlueprintBook {
    doc: JsonDocument<BTreeMap<String, String>>,
    entries: BTreeMap<String, String>,
}

fn default_book() -> BTreeMap<String, String> {
    BTreeMap::from([(NO_TEMPLATE.to_string(), String::new())])
}

impl BlueprintBook {
    pub fn open(path: PathBuf) -> Result<Self> {
        let doc = JsonDocument::new(path);
        let mut entries = doc.load_or_create(default_book)?;

        if !entries.contains_key(NO_TEMPLATE) {
            entries.insert(NO_TEMPLATE.to_string(), String::new());
            doc.save(&entries)?;
        }

        Ok(Self { doc, entries })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// New blueprint with empty text.
    pub fn create(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StateError::EmptyName);
        }
        if self.entries.contains_key(name) {
            return Err(StateError::DuplicateBlueprint(name.to_string()));
        }
        self.entries.insert(name.to_string(), String::new());
        self.doc.save(&self.entries)
    }

    /// Insert or update.
    pub fn save(&mut self, name: &str, text: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StateError::EmptyName);
        }
        self.entries.insert(name.to_string(), text.to_string());
        self.doc.save(&self.entries)
    }

    pub fn delete(&mut self, name: &str) -> Result<()> {
        if name == NO_TEMPLATE {
            return Err(StateError::ProtectedBlueprint(name.to_string()));
        }
        if self.entries.remove(name).is_none() {
            return Err(StateError::UnknownBlueprint(name.to_string()));
        }
        self.doc.save(&self.entries)
    }

    /// Instruction suffix for `selected`, or `None` when nothing contributes.
    ///
    /// Unknown names, [NO_TEMPLATE] and empty texts are skipped.
    pub fn compose<S: AsRef<str>>(&self, selected: &[S]) -> Option<String> {
        let texts: Vec<&str> = selected
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| *name != NO_TEMPLATE)
            .filter_map(|name| self.entries.get(name))
            .map(String::as_str)
            .filter(|text| !text.is_empty())
            .collect();

        if texts.is_empty() {
            return None;
        }
        Some(format!("\n\n{}\n{}", BLUEPRINT_HEADER, texts.join("\n\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn book() -> (tempfile::TempDir, BlueprintBook) {
        let dir = tempfile::tempdir().unwrap();
        let book = BlueprintBook::open(dir.path().join("templates.json")).unwrap();
        (dir, book)
    }

    #[test]
    fn round_trip_keeps_all_entries() {
        let (dir, mut book) = book();
        book.save("Pirate", "Talk like a pirate.").unwrap();
        book.save("Brief", "One paragraph max.").unwrap();

        let reloaded = BlueprintBook::open(dir.path().join("templates.json")).unwrap();
        assert_eq!(reloaded.entries(), book.entries());
        assert!(reloaded.contains(NO_TEMPLATE));
    }

    #[test]
    fn missing_no_template_is_restored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.json");
        std::fs::write(&path, r#"{"Pirate": "Arr."}"#).unwrap();

        let book = BlueprintBook::open(path.clone()).unwrap();
        assert!(book.contains(NO_TEMPLATE));
        assert!(std::fs::read_to_string(path).unwrap().contains(NO_TEMPLATE));
    }

    #[test]
    fn create_rejects_blank_and_duplicates() {
        let (_dir, mut book) = book();
        assert!(matches!(book.create("  "), Err(StateError::EmptyName)));
        book.create("Legal").unwrap();
        assert!(matches!(
            book.create("Legal"),
            Err(StateError::DuplicateBlueprint(_))
        ));
        assert_eq!(book.get("Legal"), Some(""));
    }

    #[test]
    fn no_template_cannot_be_deleted() {
        let (_dir, mut book) = book();
        assert!(matches!(
            book.delete(NO_TEMPLATE),
            Err(StateError::ProtectedBlueprint(_))
        ));
    }

    #[test]
    fn compose_skips_empty_and_joins() {
        let (_dir, mut book) = book();
        book.save("A", "First rule.").unwrap();
        book.save("B", "").unwrap();
        book.save("C", "Second rule.").unwrap();

        assert_eq!(
            book.compose(&["A", NO_TEMPLATE, "B", "C"]).as_deref(),
            Some("\n\n--- INSTRUCTIONS FROM BLUEPRINTS ---\nFirst rule.\n\nSecond rule.")
        );
        assert_eq!(book.compose(&[NO_TEMPLATE, "B"]), None);
    }
}
