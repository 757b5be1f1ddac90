//! Provider Registry
//!
//! Builds the [ModelProvider] for a family. Keys are resolved per dispatch, so
//! providers are cheap per-call values sharing one HTTP client.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Client;

use crate::catalog::ProviderFamily;
use crate::provider::ModelProvider;
use crate::providers::{AnthropicProvider, GeminiProvider, OpenAICompatibleProvider, create_client};

/// Per-family base URL overrides. Families without an entry use their public endpoint.
#[derive(Debug, Clone, Default)]
pub struct ProviderEndpoints {
  overrides: HashMap<ProviderFamily, String>,
}

impl ProviderEndpoints {
  pub fn new() -> Self {
    Self::default()
  }

  /// Point `family` at `base_url`.
  pub fn with(mut self, family: ProviderFamily, base_url: impl Into<String>) -> Self {
    self.overrides.insert(family, base_url.into());
    self
  }

  pub fn set(&mut self, family: ProviderFamily, base_url: impl Into<String>) {
    self.overrides.insert(family, base_url.into());
  }

  pub fn get(&self, family: ProviderFamily) -> Option<String> {
    self.overrides.get(&family).cloned()
  }
}

/// Provider Registry
pub struct ProviderRegistry {
  client: Client,
  endpoints: ProviderEndpoints,
}

impl ProviderRegistry {
  /// Registry whose client applies `timeout_secs` to every request.
  pub fn new(timeout_secs: u64, endpoints: ProviderEndpoints) -> Self {
    Self {
      client: create_client(Some(timeout_secs)),
      endpoints,
    }
  }

  /// Provider for `family` authenticated with `api_key`. `None` for the echo family.
  pub fn provider(&self, family: ProviderFamily, api_key: String) -> Option<Arc<dyn ModelProvider>> {
    let client = self.client.clone();
    let base_url = self.endpoints.get(family);

    let provider: Arc<dyn ModelProvider> = match family {
      ProviderFamily::OpenAI => Arc::new(OpenAICompatibleProvider::openai(client, api_key, base_url)),
      ProviderFamily::Grok => Arc::new(OpenAICompatibleProvider::grok(client, api_key, base_url)),
      ProviderFamily::Perplexity => {
        Arc::new(OpenAICompatibleProvider::perplexity(client, api_key, base_url))
      }
      ProviderFamily::Gemini => Arc::new(GeminiProvider::new(client, api_key, base_url)),
      ProviderFamily::Anthropic => Arc::new(AnthropicProvider::new(client, api_key, base_url)),
      ProviderFamily::Echo => return None,
    };
    Some(provider)
  }
}

impl Default for ProviderRegistry {
  fn default() -> Self {
    Self::new(crate::DEFAULT_TIMEOUT_SECS, ProviderEndpoints::default())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn overrides_apply_per_family() {
    let registry = ProviderRegistry::new(
      5,
      ProviderEndpoints::new().with(ProviderFamily::Grok, "http://127.0.0.1:9999"),
    );

    let grok = registry.provider(ProviderFamily::Grok, "k".into());
    assert_eq!(grok.as_ref().map(|p| p.base_url()), Some("http://127.0.0.1:9999"));
    assert_eq!(grok.as_ref().map(|p| p.family()), Some(ProviderFamily::Grok));

    let openai = registry.provider(ProviderFamily::OpenAI, "k".into());
    assert_eq!(
      openai.as_ref().map(|p| p.base_url()),
      Some("https://api.openai.com/v1")
    );
  }

  #[test]
  fn echo_has_no_provider() {
    let registry = ProviderRegistry::default();
    assert!(registry.provider(ProviderFamily::Echo, String::new()).is_none());
  }
}
