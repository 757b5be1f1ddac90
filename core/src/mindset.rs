//! Mindset: the system instruction sent ahead of every conversation.

use std::fmt;
use std::str::FromStr;

/// Appended to every system instruction.
pub const LANGUAGE_NOTE: &str =
  "\n\n[System Note: Please respond in English unless otherwise specified in the prompt.]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MindsetPreset {
  #[default]
  Neutral,
  Creative,
  Formal,
  Technical,
  Sarcastic,
  Philosophical,
  Humorous,
}

impl MindsetPreset {
  pub const ALL: [MindsetPreset; 7] = [
    MindsetPreset::Neutral,
    MindsetPreset::Creative,
    MindsetPreset::Formal,
    MindsetPreset::Technical,
    MindsetPreset::Sarcastic,
    MindsetPreset::Philosophical,
    MindsetPreset::Humorous,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      MindsetPreset::Neutral => "Neutral",
      MindsetPreset::Creative => "Creative",
      MindsetPreset::Formal => "Formal",
      MindsetPreset::Technical => "Technical",
      MindsetPreset::Sarcastic => "Sarcastic",
      MindsetPreset::Philosophical => "Philosophical",
      MindsetPreset::Humorous => "Humorous",
    }
  }
}

impl fmt::Display for MindsetPreset {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for MindsetPreset {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| format!("unknown mindset preset: {s}"))
  }
}

/// Build the system instruction from the stored preset name and custom text.
///
/// Custom text wins; an unrecognized preset name behaves as `Neutral`.
pub fn system_instruction(preset: &str, custom: &str) -> String {
  let custom = custom.trim();
  let preset: MindsetPreset = preset.parse().unwrap_or_default();

  let mut instruction = if !custom.is_empty() {
    custom.to_string()
  } else if preset != MindsetPreset::Neutral {
    format!("Your persona for this response must be: {preset}.")
  } else {
    String::new()
  };
  instruction.push_str(LANGUAGE_NOTE);
  instruction
}
