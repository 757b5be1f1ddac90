//! Gemini Provider
//!
//! `models/{id}:generateContent` with the key in the `x-goog-api-key` header.

use async_trait::async_trait;
use reqwest::Client;

use crate::catalog::ProviderFamily;
use crate::error::Result;
use crate::provider::{ModelProvider, endpoint, handle_response};
use crate::transform::{GeminiTransform, MessageTransform};
use crate::types::{ChatRequest, ChatResponse};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiProvider {
  client: Client,
  api_key: String,
  base_url: String,
}

impl GeminiProvider {
  pub fn new(client: Client, api_key: String, base_url: Option<String>) -> Self {
    Self {
      client,
      api_key,
      base_url: base_url.unwrap_or_else(|| GEMINI_BASE_URL.to_string()),
    }
  }
}

#[async_trait]
impl ModelProvider for GeminiProvider {
  fn family(&self) -> ProviderFamily {
    ProviderFamily::Gemini
  }

  fn base_url(&self) -> &str {
    &self.base_url
  }

  async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
    let url = endpoint(
      &self.base_url,
      &format!("models/{}:generateContent", request.model),
    );
    let body = GeminiTransform.transform_request(&request)?;

    let response = self
      .client
      .post(&url)
      .header("x-goog-api-key", &self.api_key)
      .json(&body)
      .send()
      .await?;

    let value = handle_response(response).await?;
    let mut reply = GeminiTransform.transform_response(&value)?;
    if reply.model.is_empty() {
      reply.model = request.model;
    }
    Ok(reply)
  }
}
