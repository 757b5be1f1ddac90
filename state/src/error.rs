// Chorus State Errors

use thiserror::Error;

/// Persistence and document errors
#[derive(Error, Debug)]
pub enum StateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Blueprint name cannot be empty")]
    EmptyName,

    #[error("Blueprint '{0}' already exists")]
    DuplicateBlueprint(String),

    #[error("Blueprint '{0}' not found")]
    UnknownBlueprint(String),

    #[error("Blueprint '{0}' cannot be deleted")]
    ProtectedBlueprint(String),

    #[error("Unknown preference: {0}")]
    UnknownPreference(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidPreference { key: String, value: String },
}

pub type Result<T> = std::result::Result<T, StateError>;
