//! Chorus Model Provider Layer
//!
//! Everything needed to turn one provider-agnostic conversation into a reply
//! from a concrete vendor:
//! - [catalog]: model label to `{family, wire model id}` lookup table
//! - [auth]: saved-key / built-in-default credential resolution
//! - [transform]: per-family request normalization and response parsing
//! - [providers]: one [ModelProvider] implementation per family
//! - [registry]: builds the provider for a family with a resolved key

pub mod auth;
pub mod catalog;
pub mod error;
pub mod image;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod transform;
pub mod types;

pub use auth::{CredentialResolver, is_usable_key};
pub use catalog::{MODEL_GROUPS, ModelEntry, ModelGroup, NO_SELECTION, ProviderFamily};
pub use error::{ProviderError, Result};
pub use provider::ModelProvider;
pub use providers::echo_reply;
pub use registry::{ProviderEndpoints, ProviderRegistry};
pub use transform::{
  AnthropicTransform, GeminiTransform, MessageTransform, OpenAICompatibleTransform,
};
pub use types::{ChatRequest, ChatResponse, Message};

/// Fixed request timeout applied when the caller does not configure one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
