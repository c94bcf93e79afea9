//! Change reporters
//!
//! A [`ChangeReporter`] is told about every transaction boundary and every
//! undo/redo after it has taken effect. Report windows, history menus and
//! network broadcasters hang off this hook; the engine itself never reads
//! what reporters do.
//!
//! Two reporters ship with the crate:
//! - [`TracingReporter`]: logs each event through `tracing`
//! - [`RecordingReporter`]: keeps an in-memory list of [`ChangeEvent`]s

use crate::change_set::ChangeSet;
use parking_lot::Mutex;
use railstate_core::{ChangeSetId, StateKey};
use std::sync::Arc;
use tracing::{debug, info};

/// Observer of change stack activity
///
/// All methods default to no-ops. They run after the stack lock has been
/// released, so a reporter may query the state manager.
pub trait ChangeReporter: Send + Sync {
    /// A transaction was closed
    fn on_close(&self, _change_set: &ChangeSet) {}

    /// A group was undone (newest set first)
    fn on_undo(&self, _undone: &[Arc<ChangeSet>]) {}

    /// A group was redone (oldest set first)
    fn on_redo(&self, _redone: &[Arc<ChangeSet>]) {}

    /// An open transaction was aborted
    fn on_abort(&self, _change_set: ChangeSetId, _reverted: usize) {}
}

/// Logs change stack activity through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ChangeReporter for TracingReporter {
    fn on_close(&self, change_set: &ChangeSet) {
        let action = change_set
            .action()
            .map(|a| a.label())
            .unwrap_or_default();
        info!(
            change_set = %change_set.id(),
            action = %action,
            changes = change_set.len(),
            linked = change_set.is_linked(),
            "action closed"
        );
        for change in change_set.changes() {
            debug!(change_set = %change_set.id(), change = %change.describe());
        }
    }

    fn on_undo(&self, undone: &[Arc<ChangeSet>]) {
        for set in undone {
            info!(
                change_set = %set.id(),
                action = %set.action().map(|a| a.label()).unwrap_or_default(),
                "action undone"
            );
        }
    }

    fn on_redo(&self, redone: &[Arc<ChangeSet>]) {
        for set in redone {
            info!(
                change_set = %set.id(),
                action = %set.action().map(|a| a.label()).unwrap_or_default(),
                "action redone"
            );
        }
    }

    fn on_abort(&self, change_set: ChangeSetId, reverted: usize) {
        info!(change_set = %change_set, reverted, "action aborted");
    }
}

/// One notification captured by [`RecordingReporter`]
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    /// A transaction was closed
    Closed {
        /// Closed set
        id: ChangeSetId,
        /// Action label, if a descriptor was given
        action: Option<String>,
        /// Cells touched
        states: Vec<StateKey>,
        /// Linked to predecessor
        linked: bool,
    },
    /// A group was undone
    Undone {
        /// Undone sets, newest first
        ids: Vec<ChangeSetId>,
    },
    /// A group was redone
    Redone {
        /// Redone sets, oldest first
        ids: Vec<ChangeSetId>,
    },
    /// A transaction was aborted
    Aborted {
        /// Discarded set
        id: ChangeSetId,
        /// Number of reverted changes
        reverted: usize,
    },
}

/// Collects change stack activity in memory
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ChangeEvent>>,
}

impl RecordingReporter {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of captured events, oldest first
    pub fn events(&self) -> Vec<ChangeEvent> {
        self.events.lock().clone()
    }

    /// Drop all captured events
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    fn push(&self, event: ChangeEvent) {
        self.events.lock().push(event);
    }
}

impl ChangeReporter for RecordingReporter {
    fn on_close(&self, change_set: &ChangeSet) {
        self.push(ChangeEvent::Closed {
            id: change_set.id(),
            action: change_set.action().map(|a| a.label()),
            states: change_set.states().into_iter().collect(),
            linked: change_set.is_linked(),
        });
    }

    fn on_undo(&self, undone: &[Arc<ChangeSet>]) {
        self.push(ChangeEvent::Undone {
            ids: undone.iter().map(|s| s.id()).collect(),
        });
    }

    fn on_redo(&self, redone: &[Arc<ChangeSet>]) {
        self.push(ChangeEvent::Redone {
            ids: redone.iter().map(|s| s.id()).collect(),
        });
    }

    fn on_abort(&self, change_set: ChangeSetId, reverted: usize) {
        self.push(ChangeEvent::Aborted {
            id: change_set,
            reverted,
        });
    }
}
