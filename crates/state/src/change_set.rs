//! Change sets
//!
//! A [`ChangeSet`] groups the changes made by one player action into one
//! atomic undo unit.
//!
//! ## Lifecycle
//!
//! ```text
//! open ──record()*──▶ open ──close(action, linked)──▶ closed (immutable)
//! ```
//!
//! Closed sets are shared as `Arc<ChangeSet>` by the change stack, so
//! nothing can reach a closed set mutably.
//!
//! ## Linking
//!
//! A set closed with `linked = true` is glued to the set closed just before
//! it. Forced follow-up actions (a merger that makes a company discard
//! trains) use this so that undo/redo treat the whole sequence as one step.

use crate::change::Change;
use railstate_core::{ActionDescriptor, ChangeSetId, StateError, StateKey, StateResult};
use std::collections::BTreeSet;

/// An ordered group of changes produced by one action
#[derive(Debug)]
pub struct ChangeSet {
    id: ChangeSetId,
    /// Insertion order is mutation order
    changes: Vec<Box<dyn Change>>,
    closed: bool,
    action: Option<ActionDescriptor>,
    linked: bool,
}

impl ChangeSet {
    /// Create an empty, open change set
    pub fn open(id: ChangeSetId) -> Self {
        Self {
            id,
            changes: Vec::new(),
            closed: false,
            action: None,
            linked: false,
        }
    }

    /// Sequence id of this set
    pub fn id(&self) -> ChangeSetId {
        self.id
    }

    /// Check if this is the bootstrap set
    pub fn is_bootstrap(&self) -> bool {
        self.id.is_bootstrap()
    }

    /// Check if this set has been closed
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Check if this set undoes/redoes together with its predecessor
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// The action descriptor stored at close time
    pub fn action(&self) -> Option<&ActionDescriptor> {
        self.action.as_ref()
    }

    /// Number of recorded changes
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Check if no changes were recorded
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Iterate recorded changes in mutation order
    pub fn changes(&self) -> impl Iterator<Item = &dyn Change> {
        self.changes.iter().map(|c| c.as_ref())
    }

    /// Keys of every cell touched by this set
    pub fn states(&self) -> BTreeSet<StateKey> {
        self.changes.iter().map(|c| c.state().clone()).collect()
    }

    /// Check if a cell was touched by this set
    pub fn contains_state(&self, key: &StateKey) -> bool {
        self.changes.iter().any(|c| c.state() == key)
    }

    /// Append a change
    ///
    /// # Errors
    ///
    /// Returns `ChangeSetClosed` if the set is already closed.
    pub fn record(&mut self, change: Box<dyn Change>) -> StateResult<()> {
        if self.closed {
            return Err(StateError::ChangeSetClosed { change_set: self.id });
        }
        self.changes.push(change);
        Ok(())
    }

    /// Seal the set
    ///
    /// `linked` glues this set to its predecessor on the stack. The stack
    /// decides where a link chain ends; the set only remembers the flag.
    ///
    /// # Errors
    ///
    /// Returns `ChangeSetClosed` if the set is already closed.
    pub fn close(&mut self, action: Option<ActionDescriptor>, linked: bool) -> StateResult<()> {
        if self.closed {
            return Err(StateError::ChangeSetClosed { change_set: self.id });
        }
        self.seal(action, linked);
        Ok(())
    }

    /// Mark the set closed without checking its previous state
    pub(crate) fn seal(&mut self, action: Option<ActionDescriptor>, linked: bool) {
        self.closed = true;
        self.action = action;
        self.linked = linked;
    }

    /// Restore every prior value, newest change first
    ///
    /// Reverse order matters: a cell written twice in one transaction must
    /// end at its value from before the transaction, not the intermediate.
    pub(crate) fn revert(&self) {
        for change in self.changes.iter().rev() {
            change.revert();
        }
    }

    /// Restore every written value, oldest change first
    pub(crate) fn reapply(&self) {
        for change in &self.changes {
            change.reapply();
        }
    }
}
