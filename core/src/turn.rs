//! Turn content and per-request conversation assembly.

use std::path::PathBuf;

use chorus_model_provider::Message;
use chorus_state::UserPrompt;

/// Full prompt used when only images were attached.
pub const IMAGE_ONLY_PROMPT: &str = "Analyze these images.";
/// What the user sees for an image-only prompt.
pub const IMAGE_ONLY_DISPLAY: &str = "(Image analysis)";

/// What one turn sends, independent of the model it goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnContent {
  /// What the user typed
  pub display_prompt: String,
  /// Typed text plus blueprint instructions
  pub full_prompt: String,
  pub image_paths: Vec<PathBuf>,
}

impl TurnContent {
  /// Combine typed text, an optional blueprint suffix and attachments.
  pub fn compose(text: &str, blueprint_suffix: Option<&str>, image_paths: Vec<PathBuf>) -> Self {
    let display_prompt = text.trim().to_string();
    let mut full_prompt = display_prompt.clone();
    if let Some(suffix) = blueprint_suffix {
      full_prompt.push_str(suffix);
    }

    if full_prompt.is_empty() && !image_paths.is_empty() {
      return Self {
        display_prompt: IMAGE_ONLY_DISPLAY.to_string(),
        full_prompt: IMAGE_ONLY_PROMPT.to_string(),
        image_paths,
      };
    }

    Self {
      display_prompt,
      full_prompt,
      image_paths,
    }
  }

  /// Content of a remembered prompt, reused verbatim.
  pub fn from_memory(entry: &UserPrompt) -> Self {
    Self {
      display_prompt: entry.display_prompt.clone(),
      full_prompt: entry.full_prompt.clone(),
      image_paths: entry.image_paths.clone(),
    }
  }
}

/// Conversation for one outgoing request.
///
/// `images` are base64 JPEG payloads and ride only on the final user entry.
pub fn build_messages(
  system: &str,
  history: &[(String, String)],
  full_prompt: &str,
  images: Vec<String>,
) -> Vec<Message> {
  let mut messages = Vec::with_capacity(history.len() * 2 + 2);
  messages.push(Message::system(system));
  for (prompt, reply) in history {
    messages.push(Message::user(prompt.as_str()));
    messages.push(Message::assistant(reply.as_str()));
  }
  messages.push(Message::user_with_images(full_prompt, images));
  messages
}
