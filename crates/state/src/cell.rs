//! StateCell: tracked mutable values
//!
//! A [`StateCell`] is one attribute of one game entity: a company's cash,
//! whether a private has closed, the set of trains in the pool. Its value
//! only changes through [`StateCell::set`] (or [`StateCell::update`]), which
//! records a change into the open transaction before storing the new value.
//!
//! ## Write Protocol
//!
//! ```text
//! 1. lock change stack
//! 2. require an open transaction      -> NoOpenTransaction otherwise
//! 3. compute new value, compare       -> equal: record nothing, return false
//! 4. record Change { prior, new }
//! 5. store new value
//! ```
//!
//! Steps 2-5 run under the stack lock, so a write is never observable
//! without its change record and vice versa.
//!
//! Values are replaced wholesale. Collection-typed cells hold persistent
//! `im` collections; see [`crate::collections`].

use crate::change::CellChange;
use crate::manager::{Root, StateManager};
use parking_lot::RwLock;
use railstate_core::{OwnerId, StateId, StateKey, StateResult, StateValue};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Shared storage of a cell's value
///
/// Referenced by the cell handle and by every change that mentions it.
pub(crate) struct CellSlot<T> {
    key: StateKey,
    value: RwLock<T>,
}

impl<T: StateValue> CellSlot<T> {
    pub(crate) fn new(key: StateKey, value: T) -> Self {
        Self {
            key,
            value: RwLock::new(value),
        }
    }

    pub(crate) fn key(&self) -> &StateKey {
        &self.key
    }

    pub(crate) fn load(&self) -> T {
        self.value.read().clone()
    }

    /// Raw write; records nothing
    pub(crate) fn store(&self, value: T) {
        *self.value.write() = value;
    }
}

/// A single tracked value with identity
///
/// Cloning a `StateCell` clones the handle; both handles see and write the
/// same value.
pub struct StateCell<T: StateValue> {
    slot: Arc<CellSlot<T>>,
    manager: Arc<StateManager>,
}

impl<T: StateValue> StateCell<T> {
    /// Create a cell bound to `root`
    ///
    /// The initial value is not recorded; the cell is usable immediately.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateState` if the root enforces unique ids and
    /// `(owner, id)` is already registered.
    pub fn create(
        root: &Root,
        owner: impl Into<OwnerId>,
        id: impl Into<StateId>,
        initial: T,
    ) -> StateResult<Self> {
        let key = StateKey::new(owner.into(), id.into());
        let manager = Arc::clone(root.state_manager());
        manager.register(&key)?;
        Ok(Self {
            slot: Arc::new(CellSlot::new(key, initial)),
            manager,
        })
    }

    /// Create a cell holding `T::default()`
    pub fn create_default(
        root: &Root,
        owner: impl Into<OwnerId>,
        id: impl Into<StateId>,
    ) -> StateResult<Self>
    where
        T: Default,
    {
        Self::create(root, owner, id, T::default())
    }

    /// Fully qualified identity
    pub fn key(&self) -> &StateKey {
        self.slot.key()
    }

    /// Owning entity
    pub fn owner(&self) -> &OwnerId {
        &self.slot.key().owner
    }

    /// Attribute name
    pub fn id(&self) -> &StateId {
        &self.slot.key().id
    }

    /// Current value
    pub fn value(&self) -> T {
        self.slot.load()
    }

    /// Borrow the current value without cloning it
    ///
    /// Cell writes attempted from `f` fail with `ReentrantWrite`.
    pub fn with_value<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let _busy = self.manager.mark_busy();
        f(&self.slot.value.read())
    }

    /// Replace the value
    ///
    /// Returns `true` if a change was recorded, `false` if `value` equals
    /// the current value (nothing is recorded in that case).
    ///
    /// # Errors
    ///
    /// Returns `NoOpenTransaction` if no transaction is open. The value is
    /// left untouched.
    pub fn set(&self, value: T) -> StateResult<bool> {
        self.update(|_| value)
    }

    /// Replace the value with `f(current)`
    ///
    /// Same contract as [`set`](Self::set). `f` runs while the change stack
    /// is locked; writes to any cell of the same root from inside `f` fail
    /// with `ReentrantWrite`.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> StateResult<bool> {
        self.try_update(|current| Ok(f(current)))
    }

    /// Replace the value with `f(current)`, or record nothing if `f` fails
    ///
    /// # Errors
    ///
    /// - `ReentrantWrite` if called from inside another write, a
    ///   [`with_value`](Self::with_value) closure or a stack inspection
    /// - `NoOpenTransaction` if no transaction is open
    /// - whatever `f` returns; the value is left untouched
    pub fn try_update(&self, f: impl FnOnce(&T) -> StateResult<T>) -> StateResult<bool> {
        let _busy = self.manager.begin_write(self.key())?;
        let mut stack = self.manager.lock_stack();
        stack.require_open(self.key())?;

        let prior = self.slot.load();
        let next = f(&prior)?;
        if next == prior {
            return Ok(false);
        }

        let change = CellChange::new(Arc::clone(&self.slot), prior, next.clone());
        let change_set = stack.record(self.key(), Box::new(change))?;
        self.slot.store(next);
        debug!(state = %self.key(), change_set = %change_set, "change recorded");
        Ok(true)
    }

    /// The state manager this cell writes through
    pub fn state_manager(&self) -> &Arc<StateManager> {
        &self.manager
    }
}

impl<T: StateValue> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
            manager: Arc::clone(&self.manager),
        }
    }
}

impl<T: StateValue> fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCell")
            .field("key", &format_args!("{}", self.key()))
            .field("value", &*self.slot.value.read())
            .finish()
    }
}

impl<T: StateValue + fmt::Display> fmt::Display for StateCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slot.value.read())
    }
}
