//! Provider Catalog
//!
//! Static mapping from the human-readable model label shown to users to the
//! provider family that serves it and the model id sent on the wire.

use serde::{Deserialize, Serialize};

/// One vendor API contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFamily {
  OpenAI,
  Gemini,
  Anthropic,
  Perplexity,
  Grok,
  /// Local deterministic echo used for labels the catalog does not know.
  Echo,
}

impl ProviderFamily {
  /// Every family that talks to a remote API.
  pub const REMOTE: [ProviderFamily; 5] = [
    ProviderFamily::OpenAI,
    ProviderFamily::Gemini,
    ProviderFamily::Anthropic,
    ProviderFamily::Perplexity,
    ProviderFamily::Grok,
  ];

  /// Key of the credentials document this family reads.
  pub fn credential_slot(self) -> Option<&'static str> {
    match self {
      ProviderFamily::OpenAI => Some("openai"),
      ProviderFamily::Gemini => Some("gemini"),
      ProviderFamily::Anthropic => Some("anthropic"),
      ProviderFamily::Perplexity => Some("perplexity"),
      ProviderFamily::Grok => Some("grok"),
      ProviderFamily::Echo => None,
    }
  }

  /// Name used in "key missing" notices.
  pub fn display_name(self) -> &'static str {
    match self {
      ProviderFamily::OpenAI => "OpenAI",
      ProviderFamily::Gemini => "Gemini",
      ProviderFamily::Anthropic => "Anthropic",
      ProviderFamily::Perplexity => "Perplexity",
      ProviderFamily::Grok => "Grok",
      ProviderFamily::Echo => "Echo",
    }
  }

  /// Name used in inline call-error text. Anthropic errors read "Claude".
  pub fn error_label(self) -> &'static str {
    match self {
      ProviderFamily::Anthropic => "Claude",
      other => other.display_name(),
    }
  }

  /// Whether requests of this family may carry inline images.
  pub fn accepts_images(self) -> bool {
    matches!(self, ProviderFamily::OpenAI | ProviderFamily::Gemini)
  }
}

/// A catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelEntry {
  pub label: &'static str,
  pub family: ProviderFamily,
  pub wire_model: &'static str,
}

const fn entry(label: &'static str, family: ProviderFamily, wire_model: &'static str) -> ModelEntry {
  ModelEntry {
    label,
    family,
    wire_model,
  }
}

use ProviderFamily::{Anthropic, Gemini, Grok, OpenAI, Perplexity};

/// Every model label with a known route.
pub const CATALOG: &[ModelEntry] = &[
  // OpenAI
  entry("OpenAI GPT-4o", OpenAI, "gpt-4o"),
  entry("OpenAI GPT-4o-mini", OpenAI, "gpt-4o-mini"),
  entry("OpenAI GPT-4 Turbo", OpenAI, "gpt-4-turbo-preview"),
  entry("OpenAI GPT-3.5 Turbo", OpenAI, "gpt-3.5-turbo"),
  // Gemini
  entry("Gemini 2.5 Pro", Gemini, "gemini-2.5-pro-preview-09-2025"),
  entry("Gemini 2.5 Flash", Gemini, "gemini-2.5-flash-preview-09-2025"),
  entry("Gemini 2.5 Flash Lite", Gemini, "gemini-2.5-flash-lite-preview-09-2025"),
  entry("Gemini 2.0 Flash", Gemini, "gemini-2.0-flash-preview-09-2025"),
  entry("Gemini 1.5 Pro", Gemini, "gemini-1.5-pro-latest"),
  entry("Gemini 1.5 Flash", Gemini, "gemini-1.5-flash-latest"),
  entry("Gemini 1.0 Pro", Gemini, "gemini-1.0-pro"),
  // Anthropic
  entry("Claude Opus 4.1", Anthropic, "claude-3-opus-20240229"),
  entry("Claude Sonnet 4", Anthropic, "claude-3-sonnet-20240229"),
  entry("Claude Haiku 3.5", Anthropic, "claude-3-haiku-20240307"),
  entry("Claude 3 Opus", Anthropic, "claude-3-opus-20240229"),
  entry("Claude 3 Sonnet", Anthropic, "claude-3-sonnet-20240229"),
  entry("Claude 3 Haiku", Anthropic, "claude-3-haiku-20240307"),
  // Perplexity
  entry("Sonar Huge 128k (Online)", Perplexity, "llama-3.1-sonar-huge-128k-online"),
  entry("Sonar Large 128k (Online)", Perplexity, "llama-3.1-sonar-large-128k-online"),
  entry("Sonar Small 128k (Online)", Perplexity, "llama-3.1-sonar-small-128k-online"),
  entry("Sonar Deep Research", Perplexity, "sonar-deep-research"),
  entry("Sonar Reasoning Pro", Perplexity, "sonar-reasoning-pro"),
  entry("Sonar Reasoning", Perplexity, "sonar-reasoning"),
  entry("Sonar Pro", Perplexity, "sonar-pro"),
  entry("Sonar Large Chat", Perplexity, "llama-3.1-sonar-large-128k-chat"),
  entry("Sonar Small Chat", Perplexity, "llama-3.1-sonar-small-128k-chat"),
  // Open source models served through Perplexity
  entry("Llama 3.1 405B", Perplexity, "llama-3.1-405b-instruct"),
  entry("Llama 3.1 70B", Perplexity, "llama-3.1-70b-instruct"),
  entry("Llama 3.1 8B", Perplexity, "llama-3.1-8b-instruct"),
  entry("Mixtral 8x7B Instruct", Perplexity, "mixtral-8x7b-instruct"),
  entry("Mistral 7B Instruct", Perplexity, "mistral-7b-instruct"),
  entry("Code Llama 34B", Perplexity, "codellama-34b-instruct"),
  // Grok
  entry("Grok 4", Grok, "grok-4"),
  entry("Grok 3", Grok, "grok-3"),
  entry("Grok 3 Mini", Grok, "grok-3-mini"),
];

/// Display grouping of labels, one picker per group.
#[derive(Debug, Clone, Copy)]
pub struct ModelGroup {
  pub name: &'static str,
  pub labels: &'static [&'static str],
}

pub const MODEL_GROUPS: &[ModelGroup] = &[
  ModelGroup {
    name: "OpenAI",
    labels: &[
      "OpenAI GPT-4o",
      "OpenAI GPT-4o-mini",
      "OpenAI GPT-4 Turbo",
      "OpenAI GPT-3.5 Turbo",
    ],
  },
  ModelGroup {
    name: "Gemini",
    labels: &[
      "Gemini 2.5 Pro",
      "Gemini 2.5 Flash",
      "Gemini 2.5 Flash Lite",
      "Gemini 2.0 Flash",
      "Gemini 1.5 Pro",
      "Gemini 1.5 Flash",
      "Gemini 1.0 Pro",
    ],
  },
  ModelGroup {
    name: "Anthropic",
    labels: &[
      "Claude Opus 4.1",
      "Claude Sonnet 4",
      "Claude Haiku 3.5",
      "Claude 3 Opus",
      "Claude 3 Sonnet",
      "Claude 3 Haiku",
    ],
  },
  ModelGroup {
    name: "Perplexity",
    labels: &[
      "Sonar Huge 128k (Online)",
      "Sonar Large 128k (Online)",
      "Sonar Small 128k (Online)",
      "Sonar Deep Research",
      "Sonar Reasoning Pro",
      "Sonar Reasoning",
      "Sonar Pro",
      "Sonar Large Chat",
      "Sonar Small Chat",
    ],
  },
  ModelGroup {
    name: "Grok",
    labels: &["Grok 4", "Grok 3", "Grok 3 Mini"],
  },
  ModelGroup {
    name: "Open Source (via PPLX)",
    labels: &[
      "Llama 3.1 405B",
      "Llama 3.1 70B",
      "Llama 3.1 8B",
      "Mixtral 8x7B Instruct",
      "Mistral 7B Instruct",
      "Code Llama 34B",
    ],
  },
];

/// Picker entry meaning "nothing selected in this group".
pub const NO_SELECTION: &str = "--- Select Model ---";

/// Look up a label. `None` means the label routes to [ProviderFamily::Echo].
pub fn lookup(label: &str) -> Option<&'static ModelEntry> {
  CATALOG.iter().find(|e| e.label == label)
}

/// Family that serves `label`.
pub fn family_of(label: &str) -> ProviderFamily {
  lookup(label).map_or(ProviderFamily::Echo, |e| e.family)
}
