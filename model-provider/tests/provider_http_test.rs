use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chorus_model_provider::{
  ChatRequest, Message, ProviderEndpoints, ProviderError, ProviderFamily, ProviderRegistry,
};

fn registry_for(family: ProviderFamily, server: &MockServer) -> ProviderRegistry {
  ProviderRegistry::new(5, ProviderEndpoints::new().with(family, server.uri()))
}

fn hello() -> ChatRequest {
  ChatRequest::new(
    "wire-model",
    vec![Message::system("Be nice."), Message::user("Hello")],
  )
}

#[tokio::test]
async fn openai_posts_bearer_chat_completion() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/chat/completions"))
    .and(header("authorization", "Bearer sk-test"))
    .and(body_partial_json(json!({
      "model": "wire-model",
      "messages": [{"role": "system", "content": "Be nice."}, {"role": "user", "content": "Hello"}]
    })))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "model": "wire-model",
      "choices": [{"message": {"role": "assistant", "content": "Hi there"}}]
    })))
    .expect(1)
    .mount(&server)
    .await;

  let registry = registry_for(ProviderFamily::OpenAI, &server);
  let provider = registry
    .provider(ProviderFamily::OpenAI, "sk-test".to_string())
    .unwrap();
  let reply = provider.chat_completion(hello()).await.unwrap();

  assert_eq!(reply.content, "Hi there");
}

#[tokio::test]
async fn gemini_sends_key_in_header() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/models/wire-model:generateContent"))
    .and(header("x-goog-api-key", "g-key"))
    .and(body_partial_json(json!({
      "systemInstruction": {"parts": [{"text": "Be nice."}]}
    })))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "candidates": [{"content": {"role": "model", "parts": [{"text": "Namaste"}]}}]
    })))
    .expect(1)
    .mount(&server)
    .await;

  let registry = registry_for(ProviderFamily::Gemini, &server);
  let provider = registry
    .provider(ProviderFamily::Gemini, "g-key".to_string())
    .unwrap();
  let reply = provider.chat_completion(hello()).await.unwrap();

  assert_eq!(reply.content, "Namaste");
  assert_eq!(reply.model, "wire-model");

  let requests = server.received_requests().await.unwrap();
  assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn anthropic_uses_version_header() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/v1/messages"))
    .and(header("x-api-key", "a-key"))
    .and(header("anthropic-version", "2023-06-01"))
    .and(body_partial_json(json!({"system": "Be nice.", "max_tokens": 4096})))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "model": "wire-model",
      "content": [{"type": "text", "text": "Hello from Claude"}]
    })))
    .expect(1)
    .mount(&server)
    .await;

  let registry = registry_for(ProviderFamily::Anthropic, &server);
  let provider = registry
    .provider(ProviderFamily::Anthropic, "a-key".to_string())
    .unwrap();
  let reply = provider.chat_completion(hello()).await.unwrap();

  assert_eq!(reply.content, "Hello from Claude");
}

#[tokio::test]
async fn non_success_status_is_api_error() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/chat/completions"))
    .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
    .mount(&server)
    .await;

  let registry = registry_for(ProviderFamily::Grok, &server);
  let provider = registry
    .provider(ProviderFamily::Grok, "x-key".to_string())
    .unwrap();
  let err = provider.chat_completion(hello()).await.unwrap_err();

  assert_eq!(err.to_string(), "API Error 429: rate limited");
}

#[tokio::test]
async fn slow_provider_times_out() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/chat/completions"))
    .respond_with(
      ResponseTemplate::new(200)
        .set_delay(std::time::Duration::from_secs(3))
        .set_body_json(json!({"choices": [{"message": {"content": "late"}}]})),
    )
    .mount(&server)
    .await;

  let registry = ProviderRegistry::new(
    1,
    ProviderEndpoints::new().with(ProviderFamily::Perplexity, server.uri()),
  );
  let provider = registry
    .provider(ProviderFamily::Perplexity, "p-key".to_string())
    .unwrap();
  let err = provider.chat_completion(hello()).await.unwrap_err();

  match err {
    ProviderError::NetworkError(e) => assert!(e.is_timeout()),
    other => panic!("expected timeout, got {other:?}"),
  }
}

#[tokio::test]
async fn connection_failure_does_not_leak_key() {
  let registry = ProviderRegistry::new(
    5,
    ProviderEndpoints::new().with(ProviderFamily::Gemini, "http://127.0.0.1:1"),
  );
  let provider = registry
    .provider(ProviderFamily::Gemini, "SECRET-GEMINI-KEY-123".to_string())
    .unwrap();
  let err = provider.chat_completion(hello()).await.unwrap_err();

  assert!(matches!(err, ProviderError::NetworkError(_)));
  let text = err.to_string();
  assert!(!text.contains("SECRET-GEMINI-KEY-123"), "{text}");
  assert!(!text.contains("127.0.0.1"), "{text}");
}
