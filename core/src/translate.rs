//! Translator
//!
//! Free Google translate endpoint; failures come back as inline text.

use chorus_model_provider::providers::create_client;
use reqwest::Client;
use serde_json::Value;

use crate::error::{DispatchError, Result};

pub const TRANSLATE_BASE_URL: &str = "https://translate.googleapis.com";

/// Language names offered to users, with their codes.
pub const LANGUAGES: &[(&str, &str)] = &[
  ("english", "en"),
  ("hindi", "hi"),
  ("french", "fr"),
  ("german", "de"),
  ("spanish", "es"),
  ("chinese (simplified)", "zh-CN"),
  ("japanese", "ja"),
  ("russian", "ru"),
  ("bengali", "bn"),
  ("arabic", "ar"),
  ("portuguese", "pt"),
  ("italian", "it"),
  ("korean", "ko"),
  ("auto", "auto"),
];

/// Code for a language name. Unknown names map to English.
pub fn lang_to_code(name: &str) -> &'static str {
  let name = name.trim().to_lowercase();
  LANGUAGES
    .iter()
    .find(|(lang, _)| *lang == name)
    .map_or("en", |(_, code)| *code)
}

pub struct Translator {
  client: Client,
  base_url: String,
}

impl Translator {
  pub fn new(timeout_secs: u64) -> Self {
    Self::with_base_url(timeout_secs, TRANSLATE_BASE_URL)
  }

  pub fn with_base_url(timeout_secs: u64, base_url: impl Into<String>) -> Self {
    Self {
      client: create_client(Some(timeout_secs)),
      base_url: base_url.into(),
    }
  }

  /// Translate `text` between two language names.
  ///
  /// Only empty input is an error; anything that goes wrong on the wire is
  /// returned as `[Translate error: ...]`.
  pub async fn translate(&self, text: &str, from: &str, to: &str) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
      return Err(DispatchError::EmptyPrompt);
    }

    let source = if from.trim().eq_ignore_ascii_case("auto") {
      "auto"
    } else {
      lang_to_code(from)
    };
    let target = lang_to_code(to);

    let request = self
      .client
      .get(format!(
        "{}/translate_a/single",
        self.base_url.trim_end_matches('/')
      ))
      .query(&[
        ("client", "gtx"),
        ("sl", source),
        ("tl", target),
        ("dt", "t"),
        ("q", text),
      ]);

    let handle = tokio::spawn(async move {
      let response = request.send().await?.error_for_status()?;
      response.json::<Value>().await
    });

    let translated = match handle.await {
      Ok(Ok(body)) => match joined_segments(&body) {
        Some(text) => text,
        None => "[Translate error: unexpected response]".to_string(),
      },
      Ok(Err(e)) => format!("[Translate error: {e}]"),
      Err(e) => format!("[Translate error: {e}]"),
    };
    Ok(translated)
  }
}

/// `[[["Hola", "Hello", ...], ...], ...]` -> concatenated first column.
fn joined_segments(body: &Value) -> Option<String> {
  let segments = body.get(0)?.as_array()?;
  Some(
    segments
      .iter()
      .filter_map(|seg| seg.get(0).and_then(Value::as_str))
      .collect(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn language_codes() {
    assert_eq!(lang_to_code("Chinese (Simplified)"), "zh-CN");
    assert_eq!(lang_to_code("Bengali"), "bn");
    assert_eq!(lang_to_code("Klingon"), "en");
  }

  #[test]
  fn segments_are_concatenated() {
    let body = json!([[["Hola. ", "Hello. "], ["Adiós", "Bye"]], null, "en"]);
    assert_eq!(joined_segments(&body).as_deref(), Some("Hola. Adiós"));
    assert_eq!(joined_segments(&json!({})), None);
  }
}
