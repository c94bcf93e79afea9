//! Error types for the state layer
//!
//! Every contract violation in the engine surfaces as a [`StateError`].
//! Errors fall into two families:
//!
//! | Kind | Meaning | Typical reaction |
//! |------|---------|------------------|
//! | [`ErrorKind::InvalidOperation`] | Caller bug in the rule engine | Abort the current action |
//! | [`ErrorKind::InvalidState`] | Expected history boundary (undo/redo exhausted) | Disable the control |
//!
//! The engine never retries and never applies a partial transaction: an
//! operation either fully succeeds or returns one of these errors with no
//! observable side effect.

use crate::types::{ChangeSetId, StateKey};
use thiserror::Error;

/// Result type for state layer operations
pub type StateResult<T> = std::result::Result<T, StateError>;

/// Broad classification of a [`StateError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller broke the transaction protocol
    InvalidOperation,
    /// Undo/redo was requested past the end of the history
    InvalidState,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidOperation => write!(f, "invalid operation"),
            ErrorKind::InvalidState => write!(f, "invalid state"),
        }
    }
}

/// All failures raised by the state layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// A cell was mutated while no transaction was open
    #[error("cannot set {state}: no transaction is open")]
    NoOpenTransaction {
        /// Cell the caller attempted to mutate
        state: StateKey,
    },

    /// `start_transaction` was called while another transaction is open
    #[error("transaction {change_set} is already open")]
    TransactionAlreadyOpen {
        /// The set that is still open
        change_set: ChangeSetId,
    },

    /// A change was recorded into, or a close was requested on, a closed set
    #[error("change set {change_set} is closed")]
    ChangeSetClosed {
        /// The closed set
        change_set: ChangeSetId,
    },

    /// `close`/`abort` was called with no open transaction
    #[error("no transaction is open")]
    NoTransaction,

    /// Undo/redo was requested while a transaction holds unclosed changes
    #[error("transaction {change_set} is in progress with {changes} change(s)")]
    TransactionInProgress {
        /// The open set
        change_set: ChangeSetId,
        /// Number of changes recorded so far
        changes: usize,
    },

    /// A cell with the same owner and id is already registered
    #[error("state {key} is already registered")]
    DuplicateState {
        /// The conflicting identity
        key: StateKey,
    },

    /// A cell was written from inside another write or read closure on
    /// the same thread
    #[error("cannot set {state}: a cell write or read is already in progress on this thread")]
    ReentrantWrite {
        /// Cell the caller attempted to mutate
        state: StateKey,
    },

    /// An arithmetic helper would leave the value's range
    #[error("cannot set {state}: arithmetic overflow")]
    Overflow {
        /// Cell the caller attempted to mutate
        state: StateKey,
    },

    /// Nothing behind the cursor can be undone (bootstrap boundary)
    #[error("nothing to undo at index {index}")]
    NothingToUndo {
        /// Current index when the undo was attempted
        index: usize,
    },

    /// Nothing ahead of the cursor can be redone
    #[error("nothing to redo at index {index}")]
    NothingToRedo {
        /// Current index when the redo was attempted
        index: usize,
    },
}

impl StateError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            StateError::NothingToUndo { .. } | StateError::NothingToRedo { .. } => {
                ErrorKind::InvalidState
            }
            _ => ErrorKind::InvalidOperation,
        }
    }

    /// Check if this is a caller/protocol error
    pub fn is_invalid_operation(&self) -> bool {
        self.kind() == ErrorKind::InvalidOperation
    }

    /// Check if this is an exhausted-history error
    ///
    /// Presentation code uses this to grey out undo/redo controls rather
    /// than report a failure.
    pub fn is_invalid_state(&self) -> bool {
        self.kind() == ErrorKind::InvalidState
    }
}
