//! Provider-agnostic chat types

use serde::{Deserialize, Serialize};

/// One turn of a conversation in provider-agnostic form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
  /// Combined mindset and blueprint directive.
  System { content: String },
  /// User turn. `images` holds base64 JPEG payloads and is only ever set on
  /// the final entry of a request.
  User {
    content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    images: Vec<String>,
  },
  /// Earlier model reply replayed as context.
  Assistant { content: String },
}

impl Message {
  pub fn system(content: impl Into<String>) -> Self {
    Message::System {
      content: content.into(),
    }
  }

  pub fn user(content: impl Into<String>) -> Self {
    Message::User {
      content: content.into(),
      images: Vec::new(),
    }
  }

  pub fn user_with_images(content: impl Into<String>, images: Vec<String>) -> Self {
    Message::User {
      content: content.into(),
      images,
    }
  }

  pub fn assistant(content: impl Into<String>) -> Self {
    Message::Assistant {
      content: content.into(),
    }
  }
}

/// Chat request handed to a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
  /// Wire model id, already resolved through the catalog.
  pub model: String,
  pub messages: Vec<Message>,
}

impl ChatRequest {
  pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
    Self {
      model: model.into(),
      messages,
    }
  }

  /// Concatenated system directives, if any.
  pub fn system_text(&self) -> Option<String> {
    let parts: Vec<&str> = self
      .messages
      .iter()
      .filter_map(|m| match m {
        Message::System { content } => Some(content.as_str()),
        _ => None,
      })
      .collect();
    if parts.is_empty() {
      None
    } else {
      Some(parts.join("\n\n"))
    }
  }
}

/// Normalized reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
  pub model: String,
  pub content: String,
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn message_serializes_with_role_tag() {
    let value = serde_json::to_value(Message::user("hi")).unwrap_or_default();
    assert_eq!(value, serde_json::json!({"role": "user", "content": "hi"}));
  }

  #[test]
  fn system_text_joins_all_directives() {
    let request = ChatRequest::new(
      "gpt-4o",
      vec![
        Message::system("a"),
        Message::user("q"),
        Message::system("b"),
      ],
    );
    assert_eq!(request.system_text().as_deref(), Some("a\n\nb"));
    assert_eq!(ChatRequest::new("m", vec![]).system_text(), None);
  }
}
