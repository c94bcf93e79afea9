//! Core types for the railstate engine
//!
//! This crate defines the vocabulary shared by the state layer and the
//! session facade:
//! - [`StateError`]: Typed failures (invalid-operation vs invalid-state)
//! - [`OwnerId`], [`StateId`], [`StateKey`]: Identity of tracked cells
//! - [`ChangeSetId`], [`SessionId`]: Identity of transactions and sessions
//! - [`ActionDescriptor`]: Opaque description of a player action
//! - [`StateValue`]: Bound for values a cell may hold

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod action;
pub mod error;
pub mod types;
pub mod value;

pub use action::ActionDescriptor;
pub use error::{ErrorKind, StateError, StateResult};
pub use types::{ChangeSetId, OwnerId, SessionId, StateId, StateKey};
pub use value::StateValue;
