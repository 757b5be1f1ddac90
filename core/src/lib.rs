// Chorus Core Library

pub mod assist;
pub mod dispatch;
pub mod error;
pub mod graph;
pub mod mindset;
pub mod orchestrator;
pub mod reveal;
pub mod session;
pub mod translate;
pub mod turn;

pub use error::{DispatchError, Result};
pub use graph::GraphAnalyzer;
pub use mindset::MindsetPreset;
pub use orchestrator::{
  DispatchState, Orchestrator, TurnEvent, TurnReply, endpoints_from_config,
};
pub use reveal::Reveal;
pub use session::{AttachOutcome, Session};
pub use translate::Translator;
pub use turn::TurnContent;
