//! One model, one request: routing, credential check, the call itself and
//! conversion of every failure into inline reply text.

use std::sync::Arc;
use std::time::Instant;

use chorus_model_provider::catalog::lookup;
use chorus_model_provider::{
  ChatRequest, CredentialResolver, Message, ModelProvider, ProviderError, ProviderFamily,
  ProviderRegistry, echo_reply, is_usable_key,
};

/// Where a model label goes.
pub enum Route {
  /// Not in the catalog: answered locally.
  Echo { label: String },
  /// Catalog family with no usable key: no call is made.
  KeyMissing { family: ProviderFamily },
  Remote {
    family: ProviderFamily,
    wire_model: &'static str,
    provider: Arc<dyn ModelProvider>,
  },
}

impl Route {
  /// Resolve `label` through the catalog and the current credentials.
  pub fn plan(label: &str, registry: &ProviderRegistry, resolver: &CredentialResolver) -> Self {
    let Some(entry) = lookup(label) else {
      return Route::Echo {
        label: label.to_string(),
      };
    };

    let slot = entry.family.credential_slot().unwrap_or_default();
    let key = resolver.resolve(slot, true);
    if !is_usable_key(&key) {
      return Route::KeyMissing {
        family: entry.family,
      };
    }

    match registry.provider(entry.family, key) {
      Some(provider) => Route::Remote {
        family: entry.family,
        wire_model: entry.wire_model,
        provider,
      },
      None => Route::Echo {
        label: label.to_string(),
      },
    }
  }

  /// Family, if the label routes to one.
  pub fn family(&self) -> ProviderFamily {
    match self {
      Route::Echo { .. } => ProviderFamily::Echo,
      Route::KeyMissing { family } | Route::Remote { family, .. } => *family,
    }
  }
}

/// Inline text for a family without a usable key
pub fn key_missing_text(family: ProviderFamily) -> String {
  format!(
    "[{} key missing. Please set it in Configuration.]",
    family.display_name()
  )
}

/// Inline text for a failed provider call
pub fn call_error_text(family: ProviderFamily, err: &ProviderError) -> String {
  format!("[{} call error: {}]", family.error_label(), err)
}

/// Inline text for a background task that panicked or was aborted
pub fn task_error_text(detail: impl std::fmt::Display) -> String {
  format!("[API error: {}]", detail)
}

/// Run one planned request to completion on its own task. Always yields text.
pub async fn execute(
  label: &str,
  route: Route,
  messages: Vec<Message>,
  display_prompt: &str,
) -> String {
  match route {
    Route::Echo { label } => echo_reply(&label, display_prompt),
    Route::KeyMissing { family } => {
      tracing::info!("{} skipped: no usable {} key", label, family.display_name());
      key_missing_text(family)
    }
    Route::Remote {
      family,
      wire_model,
      provider,
    } => {
      let request = ChatRequest::new(wire_model, messages);
      let started = Instant::now();
      tracing::info!("Dispatching {} ({})", label, wire_model);

      let handle = tokio::spawn(async move { provider.chat_completion(request).await });

      let text = match handle.await {
        Ok(Ok(response)) => response.content,
        Ok(Err(e)) => {
          tracing::warn!("{} failed: {}", label, e);
          call_error_text(family, &e)
        }
        Err(e) => {
          tracing::warn!("{} task failed: {}", label, e);
          task_error_text(e)
        }
      };

      tracing::info!("{} finished in {:?}", label, started.elapsed());
      text
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chorus_model_provider::ProviderEndpoints;
  use std::collections::HashMap;

  #[test]
  fn placeholder_key_routes_to_key_missing() {
    let registry = ProviderRegistry::new(5, ProviderEndpoints::new());
    let resolver = CredentialResolver::new(
      HashMap::from([("openai".to_string(), "sk-your-default-openai-key".to_string())]),
      true,
    );

    let route = Route::plan("OpenAI GPT-4o", &registry, &resolver);
    assert!(matches!(route, Route::KeyMissing { family: ProviderFamily::OpenAI }));
    assert_eq!(
      key_missing_text(route.family()),
      "[OpenAI key missing. Please set it in Configuration.]"
    );
  }

  #[test]
  fn unknown_label_routes_to_echo() {
    let registry = ProviderRegistry::new(5, ProviderEndpoints::new());
    let resolver = CredentialResolver::new(HashMap::new(), false);
    assert!(matches!(
      Route::plan("My Local Model", &registry, &resolver),
      Route::Echo { .. }
    ));
  }

  #[test]
  fn anthropic_errors_read_claude() {
    let err = ProviderError::ApiError {
      status: 500,
      body: "boom".to_string(),
    };
    assert_eq!(
      call_error_text(ProviderFamily::Anthropic, &err),
      "[Claude call error: API Error 500: boom]"
    );
  }

  #[tokio::test]
  async fn echo_needs_no_network() {
    let text = execute(
      "Local",
      Route::Echo {
        label: "Local".to_string(),
      },
      vec![],
      "ping",
    )
    .await;
    assert_eq!(text, "[Local mock reply] Echo: ping");
  }
}
