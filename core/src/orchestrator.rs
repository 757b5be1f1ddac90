//! Dispatch Orchestrator
//!
//! Sends one user turn to every selected model, strictly one at a time and in
//! selection order, and records the turn in the memory log.
//!
//! State flow: `Idle -> QueueBuilt -> Dispatching -> AwaitingReply -> Streaming`,
//! then back to `QueueBuilt` for the next model or `Idle` when the queue is empty.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use chorus_config::Config;
use chorus_model_provider::catalog::family_of;
use chorus_model_provider::image::encode_attachments;
use chorus_model_provider::{ProviderEndpoints, ProviderFamily, ProviderRegistry};
use chorus_state::{MemoryEntry, ModelReply, UserPrompt, timestamp_now};

use crate::dispatch::{self, Route};
use crate::error::{DispatchError, Result};
use crate::reveal::Reveal;
use crate::session::Session;
use crate::turn::{TurnContent, build_messages};

/// Observable orchestrator state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DispatchState {
  #[default]
  Idle,
  QueueBuilt { remaining: usize },
  Dispatching { model: String },
  AwaitingReply { model: String },
  Streaming { model: String },
}

/// Events for the presentation layer
#[derive(Debug, Clone)]
pub enum TurnEvent {
  Started {
    display_prompt: String,
    image_count: usize,
    queue_len: usize,
    regenerated: bool,
  },
  Querying {
    model: String,
  },
  Reply {
    model: String,
    text: String,
    reveal: Reveal,
  },
  Finished {
    replies: Vec<TurnReply>,
  },
}

/// One model's contribution to a finished turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReply {
  pub model: String,
  pub text: String,
}

/// Dispatch Orchestrator
pub struct Orchestrator {
  registry: Arc<ProviderRegistry>,
  history_limit: usize,
  state_tx: watch::Sender<DispatchState>,
  state_rx: watch::Receiver<DispatchState>,
}

impl Orchestrator {
  pub fn new(registry: Arc<ProviderRegistry>, history_limit: usize) -> Self {
    let (state_tx, state_rx) = watch::channel(DispatchState::Idle);
    Self {
      registry,
      history_limit,
      state_tx,
      state_rx,
    }
  }

  /// Build from configuration: timeout, history limit and endpoint overrides.
  pub fn from_config(config: &Config) -> Self {
    let registry = ProviderRegistry::new(
      config.network.request_timeout_secs,
      endpoints_from_config(config),
    );
    Self::new(Arc::new(registry), config.dispatch.history_limit)
  }

  pub fn registry(&self) -> &Arc<ProviderRegistry> {
    &self.registry
  }

  pub fn subscribe_state(&self) -> watch::Receiver<DispatchState> {
    self.state_rx.clone()
  }

  /// Send typed text plus the session's pending attachments.
  ///
  /// A rejected send drops the pending attachments too.
  pub async fn send(
    &self,
    session: &mut Session,
    text: &str,
    events: &mpsc::UnboundedSender<TurnEvent>,
  ) -> Result<Vec<TurnReply>> {
    let queue: VecDeque<String> = session.selected_models().iter().cloned().collect();
    if text.trim().is_empty() && session.attachments().is_empty() {
      return Err(DispatchError::EmptyPrompt);
    }
    if queue.is_empty() {
      session.clear_images();
      return Err(DispatchError::NoModelSelected);
    }

    let suffix = session.blueprint_suffix();
    let content = TurnContent::compose(text, suffix.as_deref(), session.take_attachments());
    self.run_turn(session, content, queue, false, events).await
  }

  /// Resend the most recent remembered prompt to the current selection.
  pub async fn regenerate(
    &self,
    session: &mut Session,
    events: &mpsc::UnboundedSender<TurnEvent>,
  ) -> Result<Vec<TurnReply>> {
    if !session.remember() {
      return Err(DispatchError::MemoryOff);
    }
    let content = session
      .state
      .memory
      .regenerate_source()
      .map(TurnContent::from_memory)
      .ok_or(DispatchError::NoEntry)?;

    let queue: VecDeque<String> = session.selected_models().iter().cloned().collect();
    if queue.is_empty() {
      return Err(DispatchError::NoModelSelected);
    }

    self.run_turn(session, content, queue, true, events).await
  }

  async fn run_turn(
    &self,
    session: &mut Session,
    content: TurnContent,
    mut queue: VecDeque<String>,
    regenerated: bool,
    events: &mpsc::UnboundedSender<TurnEvent>,
  ) -> Result<Vec<TurnReply>> {
    let remember = session.remember();
    self.transition(DispatchState::QueueBuilt {
      remaining: queue.len(),
    });

    if remember {
      let entry = MemoryEntry::UserPrompt(UserPrompt {
        timestamp: timestamp_now(),
        display_prompt: content.display_prompt.clone(),
        full_prompt: content.full_prompt.clone(),
        model_list: queue.iter().cloned().collect(),
        image_paths: content.image_paths.clone(),
      });
      if let Err(e) = session.state.memory.append(entry) {
        tracing::warn!("Prompt not persisted, continuing turn: {}", e);
      }
    }

    emit(
      events,
      TurnEvent::Started {
        display_prompt: content.display_prompt.clone(),
        image_count: content.image_paths.len(),
        queue_len: queue.len(),
        regenerated,
      },
    );

    let images = self.encode_images(&content, &queue).await;
    let mut replies = Vec::with_capacity(queue.len());

    while let Some(model) = queue.pop_front() {
      self.transition(DispatchState::Dispatching {
        model: model.clone(),
      });
      emit(
        events,
        TurnEvent::Querying {
          model: model.clone(),
        },
      );

      let resolver = session.credential_resolver();
      let route = Route::plan(&model, &self.registry, &resolver);

      let history = if remember {
        session.state.memory.recent_context_pairs(self.history_limit)
      } else {
        Vec::new()
      };
      let attached = if route.family().accepts_images() {
        images.clone()
      } else {
        Vec::new()
      };
      let messages = build_messages(
        &session.system_instruction(),
        &history,
        &content.full_prompt,
        attached,
      );

      self.transition(DispatchState::AwaitingReply {
        model: model.clone(),
      });
      let text = dispatch::execute(&model, route, messages, &content.display_prompt).await;

      self.transition(DispatchState::Streaming {
        model: model.clone(),
      });
      if remember {
        let entry = MemoryEntry::ModelReply(ModelReply {
          timestamp: timestamp_now(),
          model: model.clone(),
          display_prompt: content.display_prompt.clone(),
          full_prompt: content.full_prompt.clone(),
          response: text.clone(),
        });
        if let Err(e) = session.state.memory.append(entry) {
          tracing::warn!("Reply from {} not persisted: {}", model, e);
        }
      }

      emit(
        events,
        TurnEvent::Reply {
          model: model.clone(),
          text: text.clone(),
          reveal: Reveal::new(text.as_str()),
        },
      );
      replies.push(TurnReply { model, text });

      self.transition(DispatchState::QueueBuilt {
        remaining: queue.len(),
      });
    }

    session.clear_images();
    self.transition(DispatchState::Idle);
    emit(
      events,
      TurnEvent::Finished {
        replies: replies.clone(),
      },
    );
    Ok(replies)
  }

  /// Encode attachments once per turn, only if some queued family can use them.
  async fn encode_images(&self, content: &TurnContent, queue: &VecDeque<String>) -> Vec<String> {
    let wanted = queue.iter().any(|m| family_of(m).accepts_images());
    if content.image_paths.is_empty() || !wanted {
      return Vec::new();
    }

    let paths = content.image_paths.clone();
    match tokio::task::spawn_blocking(move || encode_attachments(&paths)).await {
      Ok(images) => images,
      Err(e) => {
        tracing::warn!("Image encoding task failed: {}", e);
        Vec::new()
      }
    }
  }

  fn transition(&self, state: DispatchState) {
    tracing::debug!("Dispatch state: {:?}", state);
    self.state_tx.send_replace(state);
  }
}

/// Per-family base URL overrides from `providers.<family>.base_url`.
pub fn endpoints_from_config(config: &Config) -> ProviderEndpoints {
  let mut endpoints = ProviderEndpoints::new();
  for family in ProviderFamily::REMOTE {
    let name = family.credential_slot().unwrap_or_default();
    if let Some(url) = config.provider_base_url(name) {
      endpoints.set(family, url);
    }
  }
  endpoints
}

/// A dropped receiver only stops presentation.
fn emit(events: &mpsc::UnboundedSender<TurnEvent>, event: TurnEvent) {
  let _ = events.send(event);
}
