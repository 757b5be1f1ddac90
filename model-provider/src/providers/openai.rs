//! OpenAI-compatible Provider
//!
//! OpenAI itself plus the two families that speak the same chat-completions
//! dialect: Perplexity and Grok.

use async_trait::async_trait;
use reqwest::Client;

use crate::catalog::ProviderFamily;
use crate::error::Result;
use crate::provider::{ModelProvider, endpoint, handle_response};
use crate::transform::{MessageTransform, OpenAICompatibleTransform};
use crate::types::{ChatRequest, ChatResponse};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const GROK_BASE_URL: &str = "https://api.x.ai/v1";
pub const PERPLEXITY_BASE_URL: &str = "https://api.perplexity.ai";

/// Bearer-authenticated `chat/completions` provider
pub struct OpenAICompatibleProvider {
  client: Client,
  family: ProviderFamily,
  api_key: String,
  base_url: String,
  transform: OpenAICompatibleTransform,
}

impl OpenAICompatibleProvider {
  /// OpenAI, with image parts
  pub fn openai(client: Client, api_key: String, base_url: Option<String>) -> Self {
    Self::new(
      client,
      ProviderFamily::OpenAI,
      api_key,
      base_url.unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
      OpenAICompatibleTransform::with_images(),
    )
  }

  /// Grok (xAI), text only
  pub fn grok(client: Client, api_key: String, base_url: Option<String>) -> Self {
    Self::new(
      client,
      ProviderFamily::Grok,
      api_key,
      base_url.unwrap_or_else(|| GROK_BASE_URL.to_string()),
      OpenAICompatibleTransform::text_only(),
    )
  }

  /// Perplexity, text only
  pub fn perplexity(client: Client, api_key: String, base_url: Option<String>) -> Self {
    Self::new(
      client,
      ProviderFamily::Perplexity,
      api_key,
      base_url.unwrap_or_else(|| PERPLEXITY_BASE_URL.to_string()),
      OpenAICompatibleTransform::text_only(),
    )
  }

  fn new(
    client: Client,
    family: ProviderFamily,
    api_key: String,
    base_url: String,
    transform: OpenAICompatibleTransform,
  ) -> Self {
    Self {
      client,
      family,
      api_key,
      base_url,
      transform,
    }
  }
}

#[async_trait]
impl ModelProvider for OpenAICompatibleProvider {
  fn family(&self) -> ProviderFamily {
    self.family
  }

  fn base_url(&self) -> &str {
    &self.base_url
  }

  async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
    let url = endpoint(&self.base_url, "chat/completions");
    let body = self.transform.transform_request(&request)?;

    let response = self
      .client
      .post(&url)
      .bearer_auth(&self.api_key)
      .json(&body)
      .send()
      .await?;

    let value = handle_response(response).await?;
    self.transform.transform_response(&value)
  }
}
