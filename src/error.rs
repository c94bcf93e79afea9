//! Unified error types for railstate.
//!
//! This module wraps state layer failures together with the facade's own
//! failures (configuration, rule code) in one error type.

use railstate_core::{ErrorKind, StateError};
use thiserror::Error;

/// All railstate errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Transaction protocol or history failure from the state layer
    #[error(transparent)]
    State(#[from] StateError),

    /// Rule code rejected an action inside [`GameSession::execute`]
    ///
    /// [`GameSession::execute`]: crate::GameSession::execute
    #[error("action rejected: {0}")]
    Action(String),

    /// Invalid session configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error while reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for railstate operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an action rejection.
    pub fn action(reason: impl Into<String>) -> Self {
        Error::Action(reason.into())
    }

    /// Classify a state layer failure, if this is one.
    pub fn state_kind(&self) -> Option<ErrorKind> {
        match self {
            Error::State(e) => Some(e.kind()),
            _ => None,
        }
    }

    /// Check if undo/redo ran past the end of the history.
    ///
    /// These are expected when a player clicks undo once too often.
    pub fn is_invalid_state(&self) -> bool {
        self.state_kind() == Some(ErrorKind::InvalidState)
    }

    /// Check if the transaction protocol was broken by the caller.
    pub fn is_invalid_operation(&self) -> bool {
        self.state_kind() == Some(ErrorKind::InvalidOperation)
    }

    /// Check if rule code rejected the action.
    pub fn is_action_rejected(&self) -> bool {
        matches!(self, Error::Action(_))
    }
}

// Convert from serde_json errors
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
