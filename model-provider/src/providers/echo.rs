//! Echo fallback for labels with no catalog route.

/// Characters of the prompt echoed back.
pub const ECHO_PREFIX_CHARS: usize = 400;

/// Deterministic local reply for `label`.
pub fn echo_reply(label: &str, display_prompt: &str) -> String {
  let prefix: String = display_prompt.chars().take(ECHO_PREFIX_CHARS).collect();
  format!("[{} mock reply] Echo: {}", label, prefix)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn echo_truncates_to_prefix() {
    let long = "é".repeat(500);
    let reply = echo_reply("Local", &long);
    assert!(reply.starts_with("[Local mock reply] Echo: "));
    assert_eq!(reply.chars().filter(|c| *c == 'é').count(), ECHO_PREFIX_CHARS);
  }
}
