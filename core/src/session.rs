//! Chorus Session
//!
//! Everything one user's chat surface holds between turns.

use std::path::PathBuf;

use chorus_model_provider::{CredentialResolver, NO_SELECTION};
use chorus_state::StateStore;

use crate::error::{DispatchError, Result};
use crate::mindset::{MindsetPreset, system_instruction};

/// Result of [Session::attach_images]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachOutcome {
  pub added: usize,
  /// Some paths were left out because the cap was reached
  pub truncated: bool,
}

/// Explicit session context handed to the orchestrator.
///
/// Mindset and keys live in the store's preferences and credentials so every
/// change is flushed immediately. The remember flag starts from the stored
/// `remember_messages` default and is per-run from then on, like the model
/// selection, active blueprints and pending attachments.
pub struct Session {
  pub state: StateStore,
  remember: bool,
  selected_models: Vec<String>,
  active_blueprints: Vec<String>,
  attachments: Vec<PathBuf>,
  max_attachments: usize,
}

impl Session {
  pub fn new(state: StateStore, max_attachments: usize) -> Self {
    let remember = state.preferences.get().remember_messages;
    Self {
      state,
      remember,
      selected_models: Vec::new(),
      active_blueprints: Vec::new(),
      attachments: Vec::new(),
      max_attachments,
    }
  }

  // ---- model selection ----

  /// Replace the selection. Placeholder and blank labels are dropped; order is kept.
  pub fn select_models<I, S>(&mut self, labels: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.selected_models = labels
      .into_iter()
      .map(Into::into)
      .filter(|l: &String| !l.trim().is_empty() && l != NO_SELECTION)
      .collect();
  }

  pub fn selected_models(&self) -> &[String] {
    &self.selected_models
  }

  // ---- blueprints ----

  pub fn set_active_blueprints<I, S>(&mut self, names: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.active_blueprints = names.into_iter().map(Into::into).collect();
  }

  pub fn active_blueprints(&self) -> &[String] {
    &self.active_blueprints
  }

  /// Instruction suffix for the active blueprints, if any contribute.
  pub fn blueprint_suffix(&self) -> Option<String> {
    self.state.blueprints.compose(&self.active_blueprints)
  }

  // ---- attachments ----

  /// Add image paths up to the cap, skipping ones already attached.
  ///
  /// A full list rejects the call and is left as it was.
  pub fn attach_images<I>(&mut self, paths: I) -> Result<AttachOutcome>
  where
    I: IntoIterator<Item = PathBuf>,
  {
    if self.attachments.len() >= self.max_attachments {
      return Err(DispatchError::AttachmentLimit {
        max: self.max_attachments,
      });
    }

    let mut outcome = AttachOutcome {
      added: 0,
      truncated: false,
    };
    for path in paths {
      if self.attachments.contains(&path) {
        continue;
      }
      if self.attachments.len() >= self.max_attachments {
        outcome.truncated = true;
        break;
      }
      self.attachments.push(path);
      outcome.added += 1;
    }
    Ok(outcome)
  }

  pub fn attachments(&self) -> &[PathBuf] {
    &self.attachments
  }

  pub fn clear_images(&mut self) {
    self.attachments.clear();
  }

  /// Move pending attachments into a turn.
  pub(crate) fn take_attachments(&mut self) -> Vec<PathBuf> {
    std::mem::take(&mut self.attachments)
  }

  pub fn max_attachments(&self) -> usize {
    self.max_attachments
  }

  // ---- preferences ----

  pub fn remember(&self) -> bool {
    self.remember
  }

  /// Turn memory on or off for this session. The stored default is untouched.
  pub fn set_remember(&mut self, remember: bool) {
    self.remember = remember;
  }

  pub fn set_mindset(&mut self, preset: MindsetPreset, custom: &str) -> Result<()> {
    self.state.preferences.update(|p| {
      p.ai_mindset_preset = preset.to_string();
      p.ai_mindset_custom = custom.to_string();
    })?;
    Ok(())
  }

  /// System instruction for the next request
  pub fn system_instruction(&self) -> String {
    let prefs = self.state.preferences.get();
    system_instruction(&prefs.ai_mindset_preset, &prefs.ai_mindset_custom)
  }

  /// Resolver over the current saved keys and `use_default_keys` preference
  pub fn credential_resolver(&self) -> CredentialResolver {
    CredentialResolver::new(
      self.state.credentials.snapshot(),
      self.state.preferences.get().use_default_keys,
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn session(max: usize) -> (tempfile::TempDir, Session) {
    let dir = tempfile::tempdir().unwrap();
    let state = StateStore::open(dir.path(), 500).unwrap();
    (dir, Session::new(state, max))
  }

  fn paths(range: std::ops::Range<usize>) -> Vec<PathBuf> {
    range.map(|i| PathBuf::from(format!("img{i}.png"))).collect()
  }

  #[test]
  fn placeholder_is_never_selected() {
    let (_dir, mut s) = session(20);
    s.select_models(["OpenAI GPT-4o", NO_SELECTION, "", "Grok 3"]);
    assert_eq!(s.selected_models(), ["OpenAI GPT-4o", "Grok 3"]);
  }

  #[test]
  fn attachments_fill_to_cap_then_reject() {
    let (_dir, mut s) = session(20);

    let first = s.attach_images(paths(0..15)).unwrap();
    assert_eq!(first, AttachOutcome { added: 15, truncated: false });

    let second = s.attach_images(paths(10..30)).unwrap();
    assert_eq!(second, AttachOutcome { added: 5, truncated: true });
    assert_eq!(s.attachments().len(), 20);

    let before = s.attachments().to_vec();
    let err = s.attach_images(paths(40..41)).unwrap_err();
    assert!(matches!(err, DispatchError::AttachmentLimit { max: 20 }));
    assert_eq!(s.attachments(), before.as_slice());
  }

  #[test]
  fn remember_starts_from_stored_default() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = StateStore::open(dir.path(), 500).unwrap();
    state.preferences.set("remember_messages", "false").unwrap();

    let s = Session::new(state, 20);
    assert!(!s.remember());
  }

  #[test]
  fn session_remember_override_is_not_persisted() {
    let (dir, mut s) = session(20);
    s.set_remember(false);
    assert!(!s.remember());

    let reopened = StateStore::open(dir.path(), 500).unwrap();
    assert!(reopened.preferences.get().remember_messages);
  }

  #[test]
  fn mindset_persists() {
    let (dir, mut s) = session(20);
    s.set_mindset(MindsetPreset::Technical, "").unwrap();

    let reopened = StateStore::open(dir.path(), 500).unwrap();
    assert_eq!(reopened.preferences.get().ai_mindset_preset, "Technical");
    assert!(
      s.system_instruction()
        .starts_with("Your persona for this response must be: Technical.")
    );
  }
}
