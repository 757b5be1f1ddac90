//! Unified provider message transformation layer.
//!
//! - Request normalization from the common [`ChatRequest`] to each family's payload
//! - Response normalization back to the common [`ChatResponse`] type

use serde_json::{Map, Value, json};

use crate::error::{ProviderError, Result};
use crate::image::{ATTACHMENT_MIME, data_url};
use crate::types::{ChatRequest, ChatResponse, Message};

/// Anthropic requires an explicit output budget.
pub const ANTHROPIC_MAX_TOKENS: u32 = 4096;

/// Message transform contract for providers.
pub trait MessageTransform: Send + Sync {
  /// Convert common [`ChatRequest`] payload to a provider-specific JSON payload.
  fn transform_request(&self, request: &ChatRequest) -> Result<Value>;

  /// Convert provider-specific JSON response to common [`ChatResponse`].
  fn transform_response(&self, response: &Value) -> Result<ChatResponse>;
}

/// OpenAI chat-completions shape, shared by OpenAI, Perplexity and Grok.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAICompatibleTransform {
  /// Emit `image_url` parts for attachments. Off for Perplexity and Grok.
  pub attach_images: bool,
}

impl OpenAICompatibleTransform {
  pub fn with_images() -> Self {
    Self {
      attach_images: true,
    }
  }

  pub fn text_only() -> Self {
    Self {
      attach_images: false,
    }
  }

  fn to_openai_message(&self, msg: &Message) -> Value {
    match msg {
      Message::System { content } => json!({"role": "system", "content": content}),
      Message::Assistant { content } => json!({"role": "assistant", "content": content}),
      Message::User { content, images } if self.attach_images && !images.is_empty() => {
        let mut parts = vec![json!({"type": "text", "text": content})];
        parts.extend(images.iter().map(|data| {
          json!({
            "type": "image_url",
            "image_url": {"url": data_url(data)}
          })
        }));
        json!({"role": "user", "content": parts})
      }
      Message::User { content, .. } => json!({"role": "user", "content": content}),
    }
  }
}

impl MessageTransform for OpenAICompatibleTransform {
  fn transform_request(&self, request: &ChatRequest) -> Result<Value> {
    // System directives fold into messages[0].
    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    if let Some(system) = request.system_text() {
      messages.push(json!({"role": "system", "content": system}));
    }
    messages.extend(
      request
        .messages
        .iter()
        .filter(|m| !matches!(m, Message::System { .. }))
        .map(|m| self.to_openai_message(m)),
    );

    let mut body = Map::new();
    body.insert("model".into(), json!(request.model));
    body.insert("messages".into(), Value::Array(messages));
    Ok(Value::Object(body))
  }

  fn transform_response(&self, response: &Value) -> Result<ChatResponse> {
    let content = response
      .pointer("/choices/0/message/content")
      .and_then(Value::as_str)
      .ok_or_else(|| {
        ProviderError::InvalidResponse("missing choices[0].message.content".to_string())
      })?;

    Ok(ChatResponse {
      model: model_of(response),
      content: content.to_string(),
    })
  }
}

/// Gemini `generateContent` shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeminiTransform;

impl GeminiTransform {
  fn to_gemini_content(msg: &Message) -> Option<Value> {
    match msg {
      Message::System { .. } => None,
      Message::Assistant { content } => Some(json!({"role": "model", "parts": [{"text": content}]})),
      Message::User { content, images } => {
        let mut parts = vec![json!({"text": content})];
        parts.extend(images.iter().map(|data| {
          json!({"inlineData": {"mimeType": ATTACHMENT_MIME, "data": data}})
        }));
        Some(json!({"role": "user", "parts": parts}))
      }
    }
  }
}

impl MessageTransform for GeminiTransform {
  fn transform_request(&self, request: &ChatRequest) -> Result<Value> {
    let contents: Vec<Value> = request
      .messages
      .iter()
      .filter_map(Self::to_gemini_content)
      .collect();

    let mut body = json!({"contents": contents});
    if let Some(system) = request.system_text() {
      body["systemInstruction"] = json!({"parts": [{"text": system}]});
    }
    Ok(body)
  }

  fn transform_response(&self, response: &Value) -> Result<ChatResponse> {
    let content = response
      .pointer("/candidates/0/content/parts/0/text")
      .and_then(Value::as_str)
      .ok_or_else(|| {
        ProviderError::InvalidResponse("missing candidates[0].content.parts[0].text".to_string())
      })?;

    Ok(ChatResponse {
      model: response
        .get("modelVersion")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string(),
      content: content.to_string(),
    })
  }
}

/// Anthropic messages shape. Text only.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnthropicTransform;

impl MessageTransform for AnthropicTransform {
  fn transform_request(&self, request: &ChatRequest) -> Result<Value> {
    let messages: Vec<Value> = request
      .messages
      .iter()
      .filter_map(|m| match m {
        Message::System { .. } => None,
        Message::User { content, .. } => Some(json!({"role": "user", "content": content})),
        Message::Assistant { content } => Some(json!({"role": "assistant", "content": content})),
      })
      .collect();

    let mut body = json!({
      "model": request.model,
      "max_tokens": ANTHROPIC_MAX_TOKENS,
      "messages": messages,
    });
    if let Some(system) = request.system_text() {
      body["system"] = json!(system);
    }
    Ok(body)
  }

  fn transform_response(&self, response: &Value) -> Result<ChatResponse> {
    let content = response
      .pointer("/content/0/text")
      .and_then(Value::as_str)
      .ok_or_else(|| ProviderError::InvalidResponse("missing content[0].text".to_string()))?;

    Ok(ChatResponse {
      model: model_of(response),
      content: content.to_string(),
    })
  }
}

fn model_of(response: &Value) -> String {
  response
    .get("model")
    .and_then(Value::as_str)
    .unwrap_or_default()
    .to_string()
}
