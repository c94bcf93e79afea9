//! # railstate
//!
//! Transactional, undoable game state for 18xx rule engines.
//!
//! Every mutable piece of game state lives in a tracked cell. Rule code
//! changes cells only inside a transaction; each closed transaction is one
//! player action that can be undone and redone as a unit.
//!
//! ## Quick Start
//!
//! ```ignore
//! use railstate::prelude::*;
//!
//! let game = GameSession::builder().name("1830").build()?;
//! let cash = game.cell("PRR", "cash", 0i64)?;
//! let trains: ListState<String> = game.cell_default("PRR", "trains")?;
//!
//! game.execute(ActionDescriptor::new("BuyTrain").with_actor("PRR"), false, |_| {
//!     cash.add(-80)?;
//!     trains.push("2".to_string())?;
//!     Ok(())
//! })?;
//!
//! game.undo()?;
//! assert!(trains.is_empty());
//! game.redo()?;
//! ```
//!
//! ## Layers
//!
//! - `railstate-core`: identifiers, action descriptors, error vocabulary
//! - `railstate-state`: cells, change sets, the change stack, the manager
//! - this crate: [`GameSession`], [`SessionConfig`], unified [`Error`]

#![warn(missing_docs)]

mod config;
mod error;
mod session;

pub mod prelude;

// Re-export main entry points
pub use config::SessionConfig;
pub use error::{Error, Result};
pub use session::{GameSession, GameSessionBuilder};

// Re-export the state layer
pub use railstate_state::{
    ActionDescriptor, BooleanState, Change, ChangeEvent, ChangeReporter, ChangeSet, ChangeSetId,
    ChangeStack, ErrorKind, HistoryEntry, IntegerState, ListState, ManagerOptions, MultimapState,
    OwnerId, RecordingReporter, Root, SessionId, SetState, StateCell, StateError, StateId,
    StateKey, StateManager, StateResult, StateValue, StringState, TracingReporter,
};
