//! The change stack: transaction log with cursor-based undo/redo
//!
//! ## Layout
//!
//! ```text
//!  sets:   [ #0 bootstrap | #1 | #2 | #3 | #4 ]   current: Option<open set>
//!                                     ▲
//!                                   cursor = 3
//!          └────── applied ──────┘   └ reverted ┘
//! ```
//!
//! - `sets` holds every closed set; index 0 is the bootstrap set and is
//!   never undone.
//! - `cursor` is the number of closed sets whose effects are live. Sets at
//!   `cursor..` have been undone and are available for redo.
//! - `current` is the open set receiving changes, if any.
//!
//! ## Index Arithmetic
//!
//! [`ChangeStack::cursor`] counts the bootstrap set. [`ChangeStack::current_index`]
//! does not: it is the number of player actions currently applied, so it is
//! 0 right after setup and 0 again after every action has been undone.
//!
//! ## Linked Groups
//!
//! Undo walks backward from the set behind the cursor while sets are linked
//! to their predecessor (never crossing the bootstrap set); redo walks
//! forward from the set at the cursor while the following set is linked.
//! Each group is reverted newest-to-oldest and reapplied oldest-to-newest.
//!
//! ## Divergence
//!
//! Closing a new transaction while undone sets exist discards them. History
//! is a single branch: last writer wins. Aborting a transaction or failing
//! before one is opened leaves redo history intact.

use crate::change::Change;
use crate::change_set::ChangeSet;
use railstate_core::{ActionDescriptor, ChangeSetId, StateError, StateKey, StateResult};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Transaction log with an undo/redo cursor
#[derive(Debug)]
pub struct ChangeStack {
    /// Closed sets; index 0 is the bootstrap set
    sets: Vec<Arc<ChangeSet>>,
    /// Number of closed sets whose effects are applied
    cursor: usize,
    /// The open set, if any
    current: Option<ChangeSet>,
    /// Id for the next set to open
    next_id: ChangeSetId,
    /// Index of the set most recently closed, undone or redone
    last_touched: Option<usize>,
}

/// One row of the undo/redo history, as shown to a player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    /// Change set id
    pub id: ChangeSetId,
    /// Action index (1 for the first player action)
    pub index: usize,
    /// Descriptor stored at close time
    pub action: Option<ActionDescriptor>,
    /// Whether this set undoes together with its predecessor
    pub linked: bool,
    /// Whether its effects are currently live
    pub applied: bool,
    /// Number of recorded changes
    pub changes: usize,
}

impl ChangeStack {
    /// Create a stack whose bootstrap set is open
    ///
    /// Setup code may record into the bootstrap set; those changes become
    /// permanent once it is closed.
    pub fn new() -> Self {
        Self {
            sets: Vec::new(),
            cursor: 0,
            current: Some(ChangeSet::open(ChangeSetId::BOOTSTRAP)),
            next_id: ChangeSetId::BOOTSTRAP.next(),
            last_touched: None,
        }
    }

    /// Create a stack with the bootstrap set already closed
    pub fn bootstrapped() -> Self {
        let mut bootstrap = ChangeSet::open(ChangeSetId::BOOTSTRAP);
        bootstrap.seal(None, false);

        let mut stack = Self {
            sets: Vec::new(),
            cursor: 0,
            current: None,
            next_id: ChangeSetId::BOOTSTRAP.next(),
            last_touched: None,
        };
        stack.push_closed(bootstrap);
        stack
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// The open set, if a transaction is in progress
    pub fn current_change_set(&self) -> Option<&ChangeSet> {
        self.current.as_ref()
    }

    /// The set most recently closed, undone or redone
    ///
    /// This is "what just happened": after an undo it is the newest set of
    /// the group that was undone, after a redo the newest set redone.
    pub fn previous_change_set(&self) -> Option<&Arc<ChangeSet>> {
        self.last_touched.and_then(|i| self.sets.get(i))
    }

    /// The newest set whose effects are live
    pub fn last_applied_change_set(&self) -> Option<&Arc<ChangeSet>> {
        self.cursor.checked_sub(1).and_then(|i| self.sets.get(i))
    }

    /// Number of closed sets applied, counting the bootstrap set
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of player actions applied, not counting the bootstrap set
    pub fn current_index(&self) -> usize {
        self.cursor.saturating_sub(1)
    }

    /// Number of closed sets, including undone ones
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Check if no set has been closed yet (bootstrap still open)
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Closed set at `index` (0 = bootstrap)
    pub fn change_set(&self, index: usize) -> Option<&Arc<ChangeSet>> {
        self.sets.get(index)
    }

    /// Check if a transaction is open
    pub fn in_transaction(&self) -> bool {
        self.current.is_some()
    }

    /// Check if `undo` would succeed
    pub fn can_undo(&self) -> bool {
        self.cursor > 1 && self.open_is_disposable()
    }

    /// Check if `redo` would succeed
    pub fn can_redo(&self) -> bool {
        self.cursor < self.sets.len() && self.open_is_disposable()
    }

    /// Every closed player action, oldest first
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.sets
            .iter()
            .enumerate()
            .skip(1)
            .map(|(index, set)| HistoryEntry {
                id: set.id(),
                index,
                action: set.action().cloned(),
                linked: set.is_linked(),
                applied: index < self.cursor,
                changes: set.len(),
            })
            .collect()
    }

    // =========================================================================
    // Transaction boundaries
    // =========================================================================

    /// Open a new transaction at the tip
    ///
    /// # Errors
    ///
    /// Returns `TransactionAlreadyOpen` if a set is already open.
    pub fn start_transaction(&mut self) -> StateResult<ChangeSetId> {
        if let Some(open) = &self.current {
            return Err(StateError::TransactionAlreadyOpen {
                change_set: open.id(),
            });
        }
        let id = self.next_id;
        self.next_id = id.next();
        self.current = Some(ChangeSet::open(id));
        debug!(change_set = %id, "transaction started");
        Ok(id)
    }

    /// Open a new transaction after an explicit [`close`](Self::close)
    ///
    /// Same contract as [`start_transaction`](Self::start_transaction).
    pub fn reopen(&mut self) -> StateResult<ChangeSetId> {
        self.start_transaction()
    }

    /// Append a change to the open set
    ///
    /// # Errors
    ///
    /// Returns `NoOpenTransaction` naming `state` if nothing is open.
    pub fn record(&mut self, state: &StateKey, change: Box<dyn Change>) -> StateResult<ChangeSetId> {
        let open = self
            .current
            .as_mut()
            .ok_or_else(|| StateError::NoOpenTransaction {
                state: state.clone(),
            })?;
        open.record(change)?;
        Ok(open.id())
    }

    /// Id of the open set
    ///
    /// # Errors
    ///
    /// Returns `NoOpenTransaction` naming `state` if nothing is open.
    pub fn require_open(&self, state: &StateKey) -> StateResult<ChangeSetId> {
        self.current
            .as_ref()
            .map(|open| open.id())
            .ok_or_else(|| StateError::NoOpenTransaction {
                state: state.clone(),
            })
    }

    /// Close the open set and push it as applied
    ///
    /// Does not open a new transaction; see [`close_and_reopen`](Self::close_and_reopen).
    ///
    /// If undone sets exist ahead of the cursor they are discarded first.
    ///
    /// # Errors
    ///
    /// Returns `NoTransaction` if nothing is open.
    pub fn close(
        &mut self,
        action: Option<ActionDescriptor>,
        linked: bool,
    ) -> StateResult<Arc<ChangeSet>> {
        let mut open = self.current.take().ok_or(StateError::NoTransaction)?;

        if open.is_bootstrap() {
            if linked {
                warn!("bootstrap change set cannot be linked; link ignored");
            }
            open.close(action, false)?;
            return Ok(self.push_closed(open));
        }

        if self.cursor < self.sets.len() {
            let discarded = self.sets.len() - self.cursor;
            warn!(
                change_set = %open.id(),
                discarded,
                "new action closed after undo; redo history discarded"
            );
            self.sets.truncate(self.cursor);
        }

        if linked && self.cursor <= 1 {
            warn!(
                change_set = %open.id(),
                "linked change set follows bootstrap; it will undo alone"
            );
        }

        open.close(action, linked)?;
        let closed = self.push_closed(open);
        debug!(
            change_set = %closed.id(),
            changes = closed.len(),
            linked,
            index = self.current_index(),
            "transaction closed"
        );
        Ok(closed)
    }

    /// Close the open set and immediately open a fresh one
    pub fn close_and_reopen(
        &mut self,
        action: Option<ActionDescriptor>,
        linked: bool,
    ) -> StateResult<Arc<ChangeSet>> {
        let closed = self.close(action, linked)?;
        self.start_transaction()?;
        Ok(closed)
    }

    /// Revert the open set's changes and discard it
    ///
    /// Returns the id of the discarded set and how many changes were
    /// reverted. Aborting the bootstrap set clears it and leaves it open.
    ///
    /// # Errors
    ///
    /// Returns `NoTransaction` if nothing is open.
    pub fn abort(&mut self) -> StateResult<(ChangeSetId, usize)> {
        let open = self.current.take().ok_or(StateError::NoTransaction)?;
        open.revert();
        let id = open.id();
        let reverted = open.len();
        if open.is_bootstrap() {
            self.current = Some(ChangeSet::open(id));
        }
        debug!(change_set = %id, reverted, "transaction aborted");
        Ok((id, reverted))
    }

    fn push_closed(&mut self, set: ChangeSet) -> Arc<ChangeSet> {
        let set = Arc::new(set);
        self.sets.push(Arc::clone(&set));
        self.cursor = self.sets.len();
        self.last_touched = Some(self.cursor - 1);
        set
    }

    // =========================================================================
    // Undo / redo
    // =========================================================================

    /// An empty open set may be dropped to make room for undo/redo
    fn open_is_disposable(&self) -> bool {
        self.current.as_ref().map_or(true, |open| open.is_empty())
    }

    fn check_no_pending_changes(&self) -> StateResult<()> {
        match &self.current {
            Some(open) if !open.is_empty() => Err(StateError::TransactionInProgress {
                change_set: open.id(),
                changes: open.len(),
            }),
            _ => Ok(()),
        }
    }

    fn discard_empty_open(&mut self) {
        if let Some(open) = self.current.take() {
            debug!(change_set = %open.id(), "empty transaction discarded");
        }
    }

    /// Undo the newest applied action (and every set linked to it)
    ///
    /// Returns the undone sets, newest first.
    ///
    /// # Errors
    ///
    /// - `TransactionInProgress` if the open set holds changes
    /// - `NothingToUndo` if only the bootstrap set is behind the cursor
    pub fn undo(&mut self) -> StateResult<Vec<Arc<ChangeSet>>> {
        self.check_no_pending_changes()?;
        if self.cursor <= 1 {
            return Err(StateError::NothingToUndo {
                index: self.current_index(),
            });
        }
        self.discard_empty_open();

        let mut index = self.cursor - 1;
        let mut group = vec![Arc::clone(&self.sets[index])];
        while self.sets[index].is_linked() && index > 1 {
            index -= 1;
            group.push(Arc::clone(&self.sets[index]));
        }

        for set in &group {
            set.revert();
        }
        self.last_touched = Some(self.cursor - 1);
        self.cursor = index;
        Ok(group)
    }

    /// Redo the next undone action (and every set linked to it)
    ///
    /// Returns the redone sets, oldest first.
    ///
    /// # Errors
    ///
    /// - `TransactionInProgress` if the open set holds changes
    /// - `NothingToRedo` if the cursor is at the tip
    pub fn redo(&mut self) -> StateResult<Vec<Arc<ChangeSet>>> {
        self.check_no_pending_changes()?;
        if self.cursor >= self.sets.len() {
            return Err(StateError::NothingToRedo {
                index: self.current_index(),
            });
        }
        self.discard_empty_open();

        let mut index = self.cursor;
        let mut group = vec![Arc::clone(&self.sets[index])];
        while index + 1 < self.sets.len() && self.sets[index + 1].is_linked() {
            index += 1;
            group.push(Arc::clone(&self.sets[index]));
        }

        for set in &group {
            set.reapply();
        }
        self.cursor = index + 1;
        self.last_touched = Some(index);
        Ok(group)
    }
}

impl Default for ChangeStack {
    fn default() -> Self {
        Self::bootstrapped()
    }
}
