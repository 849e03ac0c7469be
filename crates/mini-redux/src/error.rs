//! Error types for the store and its dispatch pipeline

use thiserror::Error;

/// An action-like value that cannot be dispatched
///
/// Only raised at the untyped boundary (JSON values and thunks that reach the
/// core dispatch without a thunk middleware in front of it).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidActionError {
    /// The value is not a mapping (it is a sequence, a scalar or a callable)
    #[error("action must be an object, got {found}")]
    NotAnObject { found: &'static str },

    /// The mapping has no `type` key
    #[error("the only thing an action truly requires is a type, please provide one")]
    MissingType,
}

/// Errors returned from `dispatch`
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    InvalidAction(#[from] InvalidActionError),

    #[error("failed to decode action: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("reducer failed: {0}")]
    Reducer(anyhow::Error),

    #[error("store has been dropped")]
    Detached,

    #[error("deferred dispatch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl StoreError {
    /// Whether this error was raised by action validation
    pub fn is_invalid_action(&self) -> bool {
        matches!(self, StoreError::InvalidAction(_))
    }
}
