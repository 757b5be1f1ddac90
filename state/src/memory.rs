// Chorus Memory Log
// Bounded, append-only turn history backed by chat_memory.json

use std::collections::VecDeque;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::JsonDocument;
use crate::error::Result;

/// Default number of entries kept
pub const DEFAULT_MEMORY_CAPACITY: usize = 500;

/// Characters shown per entry in listings
pub const SUMMARY_PREVIEW_CHARS: usize = 60;

/// Local time in the log's timestamp format.
pub fn timestamp_now() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// A user turn as sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPrompt {
    pub timestamp: String,
    #[serde(default)]
    pub display_prompt: String,
    #[serde(default)]
    pub full_prompt: String,
    #[serde(default)]
    pub model_list: Vec<String>,
    #[serde(default)]
    pub image_paths: Vec<PathBuf>,
}

/// One model's answer, or the inline error shown in its place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelReply {
    pub timestamp: String,
    pub model: String,
    #[serde(default)]
    pub display_prompt: String,
    #[serde(default)]
    pub full_prompt: String,
    #[serde(default)]
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MemoryEntry {
    UserPrompt(UserPrompt),
    ModelReply(ModelReply),
}

impl MemoryEntry {
    pub fn timestamp(&self) -> &str {
        match self {
            MemoryEntry::UserPrompt(p) => &p.timestamp,
            MemoryEntry::ModelReply(r) => &r.timestamp,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MemoryEntry::UserPrompt(_) => "user_prompt",
            MemoryEntry::ModelReply(_) => "model_reply",
        }
    }
}

/// Listing row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySummary {
    pub timestamp: String,
    pub kind: &'static str,
    /// `USER` for prompts, the model label for replies
    pub speaker: String,
    pub preview: String,
}

pub struct MemoryLog {
    doc: JsonDocument<VecDeque<MemoryEntry>>,
    entries: VecDeque<MemoryEntry>,
    capacity: usize,
}

impl MemoryLog {
    /// Open the log. A file longer than `capacity` is trimmed in memory; the
    /// file catches up on the next append.
    ///
    /// Entries that no longer deserialize are skipped one by one; the rest of
    /// the log loads as usual.
    pub fn open(path: PathBuf, capacity: usize) -> Result<Self> {
        let raw = JsonDocument::<Vec<Value>>::new(path.clone()).load_or_create(Vec::new)?;
        let mut entries: VecDeque<MemoryEntry> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping memory entry {}: {}", index, e);
                    None
                }
            })
            .collect();

        let doc = JsonDocument::new(path);
        let capacity = capacity.max(1);
        while entries.len() > capacity {
            entries.pop_front();
        }
        Ok(Self {
            doc,
            entries,
            capacity,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &MemoryEntry> {
        self.entries.iter()
    }

    /// Append, evict past capacity, then persist the whole log.
    ///
    /// The in-memory append always happens; the error only reports the save.
    pub fn append(&mut self, entry: MemoryEntry) -> Result<()> {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.doc.save(&self.entries).inspect_err(|e| {
            tracing::warn!("Failed to persist memory log: {}", e);
        })
    }

    /// Last `limit` replies as `(prompt, response)` pairs, oldest first.
    pub fn recent_context_pairs(&self, limit: usize) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .entries
            .iter()
            .rev()
            .filter_map(|e| match e {
                MemoryEntry::ModelReply(r) => Some(r),
                MemoryEntry::UserPrompt(_) => None,
            })
            .take(limit)
            .map(|r| {
                let prompt = if r.full_prompt.is_empty() {
                    r.display_prompt.clone()
                } else {
                    r.full_prompt.clone()
                };
                (prompt, r.response.clone())
            })
            .collect();
        pairs.reverse();
        pairs
    }

    /// Most recent user prompt.
    pub fn regenerate_source(&self) -> Option<&UserPrompt> {
        self.entries.iter().rev().find_map(|e| match e {
            MemoryEntry::UserPrompt(p) => Some(p),
            MemoryEntry::ModelReply(_) => None,
        })
    }

    /// Newest user prompt written at `timestamp`.
    pub fn find_user_prompt(&self, timestamp: &str) -> Option<&UserPrompt> {
        self.entries.iter().rev().find_map(|e| match e {
            MemoryEntry::UserPrompt(p) if p.timestamp == timestamp => Some(p),
            _ => None,
        })
    }

    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.doc.save(&self.entries)
    }

    /// Last `count` entries for display, oldest first.
    pub fn recent_summaries(&self, count: usize) -> Vec<MemorySummary> {
        let skip = self.entries.len().saturating_sub(count);
        self.entries
            .iter()
            .skip(skip)
            .map(|e| {
                let (speaker, text) = match e {
                    MemoryEntry::UserPrompt(p) => ("USER".to_string(), p.display_prompt.as_str()),
                    MemoryEntry::ModelReply(r) => (r.model.clone(), r.response.as_str()),
                };
                MemorySummary {
                    timestamp: e.timestamp().to_string(),
                    kind: e.kind(),
                    speaker,
                    preview: preview(text),
                }
            })
            .collect()
    }
}

fn preview(text: &str) -> String {
    text.chars()
        .take(SUMMARY_PREVIEW_CHARS)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn prompt(ts: &str, text: &str) -> MemoryEntry {
        MemoryEntry::UserPrompt(UserPrompt {
            timestamp: ts.to_string(),
            display_prompt: text.to_string(),
            full_prompt: text.to_string(),
            model_list: vec!["Grok 3".to_string()],
            image_paths: Vec::new(),
        })
    }

    fn reply(ts: &str, model: &str, full: &str, response: &str) -> MemoryEntry {
        MemoryEntry::ModelReply(ModelReply {
            timestamp: ts.to_string(),
            model: model.to_string(),
            display_prompt: "shown".to_string(),
            full_prompt: full.to_string(),
            response: response.to_string(),
        })
    }

    fn open(dir: &tempfile::TempDir, capacity: usize) -> MemoryLog {
        MemoryLog::open(dir.path().join("chat_memory.json"), capacity).unwrap()
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(prompt("2024-01-01 10:00:00", "hi")).unwrap();
        assert_eq!(json["type"], "user_prompt");
        assert_eq!(json["model_list"][0], "Grok 3");
    }

    #[test]
    fn append_evicts_oldest_past_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = open(&dir, DEFAULT_MEMORY_CAPACITY);
        for i in 0..=DEFAULT_MEMORY_CAPACITY {
            log.append(prompt(&format!("t{i}"), "x")).unwrap();
        }

        assert_eq!(log.len(), DEFAULT_MEMORY_CAPACITY);
        assert_eq!(log.entries().next().map(MemoryEntry::timestamp), Some("t1"));

        let reopened = open(&dir, DEFAULT_MEMORY_CAPACITY);
        assert_eq!(reopened.len(), DEFAULT_MEMORY_CAPACITY);
    }

    #[test]
    fn context_pairs_use_latest_replies_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = open(&dir, 50);
        log.append(prompt("t0", "q1")).unwrap();
        log.append(reply("t1", "A", "q1 full", "a1")).unwrap();
        log.append(reply("t2", "B", "", "a2")).unwrap();
        log.append(reply("t3", "C", "q3", "a3")).unwrap();

        assert_eq!(
            log.recent_context_pairs(2),
            vec![
                ("shown".to_string(), "a2".to_string()),
                ("q3".to_string(), "a3".to_string()),
            ]
        );
    }

    #[test]
    fn regenerate_source_is_latest_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = open(&dir, 50);
        assert!(log.regenerate_source().is_none());

        log.append(prompt("t0", "first")).unwrap();
        log.append(prompt("t1", "second")).unwrap();
        log.append(reply("t2", "A", "second", "ok")).unwrap();

        assert_eq!(
            log.regenerate_source().map(|p| p.display_prompt.as_str()),
            Some("second")
        );
    }

    #[test]
    fn find_prefers_newest_duplicate_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = open(&dir, 50);
        log.append(prompt("same", "older")).unwrap();
        log.append(prompt("same", "newer")).unwrap();

        assert_eq!(
            log.find_user_prompt("same").map(|p| p.display_prompt.as_str()),
            Some("newer")
        );
        assert!(log.find_user_prompt("missing").is_none());
    }

    #[test]
    fn summaries_flatten_and_truncate() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = open(&dir, 50);
        log.append(prompt("t0", "line one\nline two")).unwrap();
        log.append(reply("t1", "Grok 3", "", &"y".repeat(80))).unwrap();

        let rows = log.recent_summaries(100);
        assert_eq!(rows[0].preview, "line one line two");
        assert_eq!(rows[0].speaker, "USER");
        assert_eq!(rows[1].preview.len(), SUMMARY_PREVIEW_CHARS);
        assert_eq!(rows[1].kind, "model_reply");

        assert_eq!(log.recent_summaries(1).len(), 1);
    }

    #[test]
    fn clear_persists_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = open(&dir, 50);
        log.append(prompt("t0", "x")).unwrap();
        log.clear().unwrap();

        assert!(open(&dir, 50).is_empty());
    }

    #[test]
    fn undecodable_entry_is_skipped_and_the_rest_survive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat_memory.json");
        let mut raw: Vec<Value> = (0..50)
            .map(|i| serde_json::to_value(prompt(&format!("t{i}"), "x")).unwrap())
            .collect();
        raw.push(serde_json::json!({
            "type": "model_reply",
            "timestamp": "t50",
            "response": "no model field"
        }));
        std::fs::write(&path, serde_json::to_string(&raw).unwrap()).unwrap();

        let mut log = open(&dir, DEFAULT_MEMORY_CAPACITY);
        assert_eq!(log.len(), 50);

        log.append(prompt("t51", "y")).unwrap();
        let on_disk: Vec<Value> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.len(), 51);
        assert_eq!(on_disk[0]["timestamp"], "t0");
        assert_eq!(on_disk[50]["timestamp"], "t51");
    }
}
