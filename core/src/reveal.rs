//! Word-by-word reveal of a finished reply.

use std::sync::Arc;
use std::time::Duration;

use futures::Stream;

/// Default delay between words
pub const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_millis(35);

/// A finished reply split into whitespace-separated words.
///
/// Cheap to clone; every call to [Reveal::words] or [Reveal::paced] starts
/// from the first word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
  text: Arc<str>,
}

impl Reveal {
  pub fn new(text: impl Into<Arc<str>>) -> Self {
    Self { text: text.into() }
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  /// Nothing to reveal; the renderer moves straight on.
  pub fn is_empty(&self) -> bool {
    self.words().next().is_none()
  }

  pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
    self.text.split_whitespace()
  }

  pub fn word_count(&self) -> usize {
    self.words().count()
  }

  /// Words as an async stream, one per `interval`.
  pub fn paced(&self, interval: Duration) -> impl Stream<Item = String> + Send + 'static {
    let text = Arc::clone(&self.text);
    async_stream::stream! {
      let mut ticker = tokio::time::interval(interval);
      for word in text.split_whitespace() {
        ticker.tick().await;
        yield word.to_string();
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use futures::StreamExt;
  use pretty_assertions::assert_eq;

  #[test]
  fn words_restart_each_call() {
    let reveal = Reveal::new("one  two\nthree");
    assert_eq!(reveal.words().collect::<Vec<_>>(), vec!["one", "two", "three"]);
    assert_eq!(reveal.word_count(), 3);
  }

  #[test]
  fn whitespace_only_is_empty() {
    assert!(Reveal::new(" \n\t").is_empty());
    assert!(!Reveal::new("x").is_empty());
  }

  #[tokio::test]
  async fn paced_yields_every_word() {
    let reveal = Reveal::new("a b c");
    let words: Vec<String> = reveal.paced(DEFAULT_REVEAL_INTERVAL).collect().await;
    assert_eq!(words, vec!["a", "b", "c"]);
  }
}
