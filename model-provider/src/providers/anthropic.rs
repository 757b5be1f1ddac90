//! Anthropic Provider
//!
//! Messages API, text only.

use async_trait::async_trait;
use reqwest::Client;

use crate::catalog::ProviderFamily;
use crate::error::Result;
use crate::provider::{ModelProvider, endpoint, handle_response};
use crate::transform::{AnthropicTransform, MessageTransform};
use crate::types::{ChatRequest, ChatResponse};

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
  client: Client,
  api_key: String,
  base_url: String,
}

impl AnthropicProvider {
  pub fn new(client: Client, api_key: String, base_url: Option<String>) -> Self {
    Self {
      client,
      api_key,
      base_url: base_url.unwrap_or_else(|| ANTHROPIC_BASE_URL.to_string()),
    }
  }
}

#[async_trait]
impl ModelProvider for AnthropicProvider {
  fn family(&self) -> ProviderFamily {
    ProviderFamily::Anthropic
  }

  fn base_url(&self) -> &str {
    &self.base_url
  }

  async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
    let url = endpoint(&self.base_url, "v1/messages");
    let body = AnthropicTransform.transform_request(&request)?;

    let response = self
      .client
      .post(&url)
      .header("x-api-key", &self.api_key)
      .header("anthropic-version", ANTHROPIC_VERSION)
      .json(&body)
      .send()
      .await?;

    let value = handle_response(response).await?;
    AnthropicTransform.transform_response(&value)
  }
}
