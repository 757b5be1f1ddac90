//! Image to graph: one Gemini vision request asking for equations that trace
//! the main subject of a picture.

use std::path::PathBuf;

use chorus_model_provider::catalog::lookup;
use chorus_model_provider::image::encode_jpeg_base64;
use chorus_model_provider::{
  ChatRequest, CredentialResolver, Message, ProviderEndpoints, ProviderFamily, ProviderRegistry,
  is_usable_key,
};

use crate::error::{DispatchError, Result};

/// Catalog label every graph request goes to
pub const GRAPH_MODEL: &str = "Gemini 2.5 Flash";

/// Vision requests get longer than chat turns.
pub const GRAPH_TIMEOUT_SECS: u64 = 90;

pub const GRAPH_PROMPT: &str = "Analyze this image and provide a set of mathematical equations (such as parametric equations, polar coordinates, or Cartesian functions) that could be used to draw the main subject of this image on a graph. Focus on the core outline and shape. Provide only the equations, formatted clearly and ready for use. *** IMPORTANT: Respond only in English. ***";

pub struct GraphAnalyzer {
  registry: ProviderRegistry,
}

impl GraphAnalyzer {
  pub fn new(endpoints: ProviderEndpoints) -> Self {
    Self {
      registry: ProviderRegistry::new(GRAPH_TIMEOUT_SECS, endpoints),
    }
  }

  /// Ask for equations describing `image`.
  ///
  /// A missing Gemini key or an image that cannot be encoded is an error
  /// returned before any call; provider failures come back as
  /// `[Graph analysis error: ...]`.
  pub async fn analyze(&self, resolver: &CredentialResolver, image: PathBuf) -> Result<String> {
    let key = resolver.resolve("gemini", true);
    if !is_usable_key(&key) {
      return Err(DispatchError::KeyMissing(ProviderFamily::Gemini.display_name()));
    }

    let encoded = tokio::task::spawn_blocking(move || encode_jpeg_base64(&image))
      .await
      .map_err(|e| DispatchError::Image(e.to_string()))?
      .map_err(|e| DispatchError::Image(e.to_string()))?;

    let wire_model =
      lookup(GRAPH_MODEL).map_or("gemini-2.5-flash-preview-09-2025", |e| e.wire_model);
    let Some(provider) = self.registry.provider(ProviderFamily::Gemini, key) else {
      return Ok("[Graph analysis error: provider unavailable]".to_string());
    };
    let request = ChatRequest::new(
      wire_model,
      vec![Message::user_with_images(GRAPH_PROMPT, vec![encoded])],
    );

    tracing::info!("Image to graph via {}", wire_model);
    let handle = tokio::spawn(async move { provider.chat_completion(request).await });
    let text = match handle.await {
      Ok(Ok(response)) => response.content,
      Ok(Err(e)) => {
        tracing::warn!("Graph analysis failed: {}", e);
        format!("[Graph analysis error: {e}]")
      }
      Err(e) => format!("[Graph analysis error: {e}]"),
    };
    Ok(text)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  #[tokio::test]
  async fn missing_gemini_key_is_rejected_before_reading_the_image() {
    let analyzer = GraphAnalyzer::new(ProviderEndpoints::new());
    let resolver = CredentialResolver::new(
      HashMap::from([("gemini_image".to_string(), "real-image-key".to_string())]),
      true,
    );

    let err = analyzer
      .analyze(&resolver, PathBuf::from("does-not-exist.png"))
      .await
      .unwrap_err();
    assert!(matches!(err, DispatchError::KeyMissing("Gemini")));
  }

  #[tokio::test]
  async fn unreadable_image_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = GraphAnalyzer::new(ProviderEndpoints::new());
    let resolver = CredentialResolver::new(
      HashMap::from([("gemini".to_string(), "g-live".to_string())]),
      false,
    );

    let err = analyzer
      .analyze(&resolver, dir.path().join("missing.png"))
      .await
      .unwrap_err();
    assert!(matches!(err, DispatchError::Image(_)));
  }
}
