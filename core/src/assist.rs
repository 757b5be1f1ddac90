//! Business assist presets: one system prompt, one user text, one reply.

use chorus_model_provider::catalog::lookup;
use chorus_model_provider::{
  ChatRequest, CredentialResolver, Message, ProviderFamily, ProviderRegistry, is_usable_key,
};

use crate::error::{DispatchError, Result};

/// Catalog label every assist request goes to
pub const ASSIST_MODEL: &str = "OpenAI GPT-4o-mini";

pub const ASSIST_TASKS: &[(&str, &str)] = &[
  (
    "Write Professional Email",
    "You are a business assistant. Write a clear, concise, and professional email based on the following points. Include a subject line.",
  ),
  (
    "Summarize Text",
    "You are a business analyst. Summarize the following text into key bullet points, focusing on the most important actions or conclusions.",
  ),
  (
    "Draft Business Plan Section",
    "You are a business consultant. Draft a professional business plan section (e.g., 'Executive Summary', 'Marketing Strategy') for the following topic.",
  ),
  (
    "Marketing Slogan Ideas",
    "You are a creative director. Generate 10 catchy marketing slogans for the following product or company.",
  ),
  (
    "SWOT Analysis",
    "You are a business strategist. Provide a brief SWOT analysis (Strengths, Weaknesses, Opportunities, Threats) for the following company or idea.",
  ),
];

pub const FALLBACK_SYSTEM_PROMPT: &str = "You are a helpful business assistant.";

/// System prompt for a task name
pub fn system_prompt_for(task: &str) -> &'static str {
  ASSIST_TASKS
    .iter()
    .find(|(name, _)| *name == task)
    .map_or(FALLBACK_SYSTEM_PROMPT, |(_, prompt)| *prompt)
}

/// Run one assist request.
///
/// Missing key and empty input are errors returned before any call; provider
/// failures come back as `[Business Assist Error: ...]`.
pub async fn run_assist(
  registry: &ProviderRegistry,
  resolver: &CredentialResolver,
  task: &str,
  input: &str,
) -> Result<String> {
  let key = resolver.resolve("openai", true);
  if !is_usable_key(&key) {
    return Err(DispatchError::KeyMissing(ProviderFamily::OpenAI.display_name()));
  }

  let input = input.trim();
  if input.is_empty() {
    return Err(DispatchError::EmptyPrompt);
  }

  let wire_model = lookup(ASSIST_MODEL).map_or("gpt-4o-mini", |e| e.wire_model);
  let Some(provider) = registry.provider(ProviderFamily::OpenAI, key) else {
    return Ok("[Business Assist Error: provider unavailable]".to_string());
  };
  let request = ChatRequest::new(
    wire_model,
    vec![Message::system(system_prompt_for(task)), Message::user(input)],
  );

  tracing::info!("Business assist: {}", task);
  let handle = tokio::spawn(async move { provider.chat_completion(request).await });
  let text = match handle.await {
    Ok(Ok(response)) => response.content,
    Ok(Err(e)) => format!("[Business Assist Error: {e}]"),
    Err(e) => format!("[Business Assist Error: {e}]"),
  };
  Ok(text)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  #[test]
  fn unknown_task_uses_fallback() {
    assert_eq!(system_prompt_for("Write a Poem"), FALLBACK_SYSTEM_PROMPT);
    assert!(system_prompt_for("SWOT Analysis").contains("SWOT"));
  }

  #[tokio::test]
  async fn placeholder_key_is_rejected_before_any_call() {
    let registry = ProviderRegistry::default();
    let resolver = CredentialResolver::new(HashMap::new(), true);

    let err = run_assist(&registry, &resolver, "Summarize Text", "numbers")
      .await
      .unwrap_err();
    assert!(matches!(err, DispatchError::KeyMissing("OpenAI")));
  }
}
