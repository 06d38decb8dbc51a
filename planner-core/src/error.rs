//! Error types for the planner core.

use thiserror::Error;

/// Errors that can occur in planner operations.
///
/// Conditions the core recovers from locally (malformed persisted JSON,
/// unknown recurrence frequencies, updates of unknown ids) never show up
/// here; they are logged or reported as diagnostics instead.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;
