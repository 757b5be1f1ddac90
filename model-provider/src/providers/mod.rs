//! Model provider implementations
//!
//! One implementation for each supported family

use std::time::Duration;

use reqwest::Client;

use crate::DEFAULT_TIMEOUT_SECS;

pub mod anthropic;
pub mod echo;
pub mod gemini;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use echo::echo_reply;
pub use gemini::GeminiProvider;
pub use openai::OpenAICompatibleProvider;

/// Create an HTTP client with the per-request timeout applied
pub fn create_client(timeout: Option<u64>) -> Client {
  let timeout = Duration::from_secs(timeout.unwrap_or(DEFAULT_TIMEOUT_SECS));

  Client::builder()
    .timeout(timeout)
    .build()
    .unwrap_or_else(|e| {
      tracing::warn!("HTTP client setup failed, using defaults: {}", e);
      Client::new()
    })
}
