//! Provider layer error types

use thiserror::Error;

/// Model provider errors
#[derive(Error, Debug)]
pub enum ProviderError {
  /// Response did not have the shape the family promises
  #[error("Invalid response: {0}")]
  InvalidResponse(String),

  /// Non-success HTTP status from the provider
  #[error("API Error {status}: {body}")]
  ApiError { status: u16, body: String },

  /// Network error, including request timeouts. Never carries the request URL.
  #[error("Network error: {0}")]
  NetworkError(reqwest::Error),

  /// JSON parse error
  #[error("JSON parse error: {0}")]
  JsonError(#[from] serde_json::Error),

  /// Local image could not be read or re-encoded
  #[error("Image error: {0}")]
  ImageError(String),
}

impl From<reqwest::Error> for ProviderError {
  fn from(e: reqwest::Error) -> Self {
    // Rendered errors end up in replies and the memory log: no URLs.
    ProviderError::NetworkError(e.without_url())
  }
}

/// Alias for Result<T, ProviderError>
pub type Result<T> = std::result::Result<T, ProviderError>;
