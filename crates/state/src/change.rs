//! Change records
//!
//! A [`Change`] describes one mutation of one cell. It captures both
//! endpoints of the mutation at the moment it happens:
//!
//! - `prior`: the value before the write, restored by undo
//! - `next`: the value after the write, restored by redo
//!
//! Storing both endpoints is what makes redo a pure replay of effects. The
//! rule code that produced the mutation is never re-run.
//!
//! Changes are type-erased behind the [`Change`] trait so that one change
//! set can hold mutations of cells of any value type.

use crate::cell::CellSlot;
use railstate_core::{StateKey, StateValue};
use std::fmt;
use std::sync::Arc;

/// One recorded mutation of a single cell
///
/// Immutable once created. Implementations write into the cell directly and
/// never record history themselves, so replaying a change during undo/redo
/// cannot grow the log.
pub trait Change: fmt::Debug + Send + Sync {
    /// Identity of the mutated cell
    fn state(&self) -> &StateKey;

    /// Restore the value held before this mutation
    fn revert(&self);

    /// Restore the value this mutation wrote
    fn reapply(&self);

    /// Human-readable rendering, e.g. `PRR.cash: 100 -> 80`
    fn describe(&self) -> String;
}

/// Change of a typed cell
pub(crate) struct CellChange<T: StateValue> {
    slot: Arc<CellSlot<T>>,
    prior: T,
    next: T,
}

impl<T: StateValue> CellChange<T> {
    pub(crate) fn new(slot: Arc<CellSlot<T>>, prior: T, next: T) -> Self {
        Self { slot, prior, next }
    }
}

impl<T: StateValue> Change for CellChange<T> {
    fn state(&self) -> &StateKey {
        self.slot.key()
    }

    fn revert(&self) {
        self.slot.store(self.prior.clone());
    }

    fn reapply(&self) {
        self.slot.store(self.next.clone());
    }

    fn describe(&self) -> String {
        format!("{}: {:?} -> {:?}", self.slot.key(), self.prior, self.next)
    }
}

impl<T: StateValue> fmt::Debug for CellChange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellChange")
            .field("state", self.slot.key())
            .field("prior", &self.prior)
            .field("next", &self.next)
            .finish()
    }
}
