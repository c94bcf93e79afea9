//! Convenient imports for railstate.
//!
//! ```ignore
//! use railstate::prelude::*;
//!
//! let game = GameSession::new()?;
//! let floated = game.cell("PRR", "floated", false)?;
//! ```

// Main entry point
pub use crate::session::{GameSession, GameSessionBuilder};
pub use crate::config::SessionConfig;

// Error handling
pub use crate::error::{Error, Result};

// Cells
pub use railstate_state::{
    BooleanState, IntegerState, ListState, MultimapState, SetState, StateCell, StringState,
};

// Identity and actions
pub use railstate_state::{ActionDescriptor, OwnerId, Root, StateId, StateKey};

// Collection values
pub use im::{OrdMap, OrdSet, Vector};
