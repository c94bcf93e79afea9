//! Transactional state layer for railstate
//!
//! This crate implements reversible game state:
//! - StateCell: A tracked mutable value with identity
//! - Change: One recorded (prior, new) value pair
//! - ChangeSet: The atomic group of changes made by one player action
//! - ChangeStack: The transaction log with cursor-based undo/redo
//! - StateManager / Root: The shared anchor every cell writes through
//!
//! ## Control Flow
//!
//! ```text
//! start_transaction()      opens a ChangeSet at the tip
//! cell.set(v)              appends Change { prior, new } to the open set
//! close(action, linked)    seals the set; it becomes one undo unit
//! undo() / redo()          revert / reapply whole (linked) groups
//! ```
//!
//! Container-typed state (sets, lists, multimaps) is held as persistent
//! `im` collections and replaced wholesale on every mutation, so one
//! capture/restore contract covers every cell type.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cell;
pub mod change;
pub mod change_set;
pub mod change_stack;
pub mod collections;
pub mod manager;
pub mod reporter;
pub mod typed;

pub use cell::StateCell;
pub use change::Change;
pub use change_set::ChangeSet;
pub use change_stack::{ChangeStack, HistoryEntry};
pub use collections::{ListState, MultimapState, SetState};
pub use manager::{ManagerOptions, Root, StateManager};
pub use reporter::{ChangeEvent, ChangeReporter, RecordingReporter, TracingReporter};
pub use typed::{BooleanState, IntegerState, StringState};

// Re-export the core vocabulary for convenience
pub use railstate_core::{
    ActionDescriptor, ChangeSetId, ErrorKind, OwnerId, SessionId, StateError, StateId, StateKey,
    StateResult, StateValue,
};
