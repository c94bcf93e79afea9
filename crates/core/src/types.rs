//! Identity types for the state layer
//!
//! This module defines the identifiers used throughout the system:
//! - [`OwnerId`]: The game entity a cell belongs to (company, player, bank)
//! - [`StateId`]: The attribute name of a cell, unique within its owner
//! - [`StateKey`]: Fully qualified cell identity (`owner.id`)
//! - [`ChangeSetId`]: Sequence number of a transaction within a session
//! - [`SessionId`]: Unique identifier for a running game session

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of the entity that owns a cell
///
/// Owners are used for diagnostics only; the engine never dereferences
/// them. Every session has an implicit [`OwnerId::root`] owner for
/// game-wide state.
///
/// # Examples
///
/// ```
/// use railstate_core::OwnerId;
///
/// let prr = OwnerId::new("PRR");
/// assert_eq!(prr.as_str(), "PRR");
/// assert!(OwnerId::root().is_root());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerId(String);

impl OwnerId {
    const ROOT: &'static str = "root";

    /// Create an owner identifier
    pub fn new(id: impl Into<String>) -> Self {
        OwnerId(id.into())
    }

    /// The game-wide root owner
    pub fn root() -> Self {
        OwnerId(Self::ROOT.to_string())
    }

    /// Check if this is the root owner
    pub fn is_root(&self) -> bool {
        self.0 == Self::ROOT
    }

    /// Borrow the identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(s: &str) -> Self {
        OwnerId::new(s)
    }
}

impl From<String> for OwnerId {
    fn from(s: String) -> Self {
        OwnerId(s)
    }
}

/// Attribute name of a cell, unique within its owner
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(String);

impl StateId {
    /// Create a state identifier
    pub fn new(id: impl Into<String>) -> Self {
        StateId(id.into())
    }

    /// Borrow the identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StateId {
    fn from(s: &str) -> Self {
        StateId::new(s)
    }
}

impl From<String> for StateId {
    fn from(s: String) -> Self {
        StateId(s)
    }
}

/// Fully qualified identity of a cell
///
/// Displayed as `owner.id`, e.g. `PRR.floated`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateKey {
    /// Owning entity
    pub owner: OwnerId,
    /// Attribute name
    pub id: StateId,
}

impl StateKey {
    /// Create a key from its parts
    pub fn new(owner: OwnerId, id: StateId) -> Self {
        Self { owner, id }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.id)
    }
}

/// Sequence number of a change set
///
/// Allocated monotonically by the change stack; the bootstrap set is
/// always [`ChangeSetId::BOOTSTRAP`]. Ids are never reused within a
/// session, even after redo history is truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChangeSetId(u64);

impl ChangeSetId {
    /// Id of the bootstrap set
    pub const BOOTSTRAP: ChangeSetId = ChangeSetId(0);

    /// Create an id from its raw sequence number
    pub fn new(seq: u64) -> Self {
        ChangeSetId(seq)
    }

    /// Raw sequence number
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The id following this one
    pub fn next(&self) -> Self {
        ChangeSetId(self.0 + 1)
    }

    /// Check if this is the bootstrap set
    pub fn is_bootstrap(&self) -> bool {
        *self == Self::BOOTSTRAP
    }
}

impl fmt::Display for ChangeSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Unique identifier for a game session
///
/// Attached to tracing output so that logs from concurrent test sessions
/// can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new random SessionId using UUID v4
    pub fn new() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
