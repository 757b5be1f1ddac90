//! Orchestrator errors
//!
//! Provider failures never surface here: they are rendered inline as reply
//! text. These are the precondition failures that stop a turn before it starts.

use thiserror::Error;

use chorus_state::StateError;

#[derive(Error, Debug)]
pub enum DispatchError {
  #[error("Please select at least one model.")]
  NoModelSelected,

  #[error("Please type a message or attach images.")]
  EmptyPrompt,

  #[error("Cannot regenerate when memory is off.")]
  MemoryOff,

  #[error("No previous message to regenerate.")]
  NoEntry,

  #[error("Attachment limit of {max} images reached.")]
  AttachmentLimit { max: usize },

  #[error("{0} key is missing. Please set it in Configuration.")]
  KeyMissing(&'static str),

  #[error("Failed to process image: {0}")]
  Image(String),

  #[error(transparent)]
  State(#[from] StateError),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
