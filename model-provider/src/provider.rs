//! Model Provider trait
//!
//! This module defines the [ModelProvider] trait that every provider family implements.

use async_trait::async_trait;
use reqwest::Response;
use serde_json::Value;

use crate::catalog::ProviderFamily;
use crate::error::{ProviderError, Result};
use crate::types::{ChatRequest, ChatResponse};

/// Model Provider trait
///
/// One implementation per family: normalize the request, make one HTTPS call,
/// parse the reply.
#[async_trait]
pub trait ModelProvider: Send + Sync {
  /// Family served by this provider
  fn family(&self) -> ProviderFamily;

  /// Base URL requests are sent to
  fn base_url(&self) -> &str;

  /// Creates a chat completion
  async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse>;
}

/// Turn a non-success status into [ProviderError::ApiError], otherwise parse JSON.
pub async fn handle_response(response: Response) -> Result<Value> {
  let status = response.status();
  if !status.is_success() {
    let body = response.text().await.unwrap_or_default();
    return Err(ProviderError::ApiError {
      status: status.as_u16(),
      body,
    });
  }

  let text = response.text().await?;
  Ok(serde_json::from_str(&text)?)
}

/// Join `base` and `path` with exactly one slash.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
  format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn endpoint_joins_cleanly() {
    assert_eq!(
      endpoint("https://api.x.ai/v1/", "/chat/completions"),
      "https://api.x.ai/v1/chat/completions"
    );
  }
}
