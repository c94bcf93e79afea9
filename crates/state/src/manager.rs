//! State manager and root handle
//!
//! The [`StateManager`] is the single writer every cell goes through. It
//! owns exactly one [`ChangeStack`] and is injected into each cell at
//! creation, so "the currently open transaction" is an explicit shared
//! handle rather than ambient global state.
//!
//! [`Root`] is the cheap, cloneable handle game code passes around.
//!
//! ## Locking
//!
//! The stack sits behind a `parking_lot::Mutex`. Lock order is always
//! stack before cell, both for writes (`StateCell::set`) and for replay
//! (undo/redo). Reporters are notified after the stack lock is released so
//! they may query the manager.

use crate::change_set::ChangeSet;
use crate::change_stack::{ChangeStack, HistoryEntry};
use crate::reporter::ChangeReporter;
use parking_lot::{Mutex, MutexGuard, RwLock};
use railstate_core::{
    ActionDescriptor, ChangeSetId, SessionId, StateError, StateKey, StateResult,
};
use rustc_hash::FxHashSet;
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Options for a state manager
#[derive(Debug, Clone)]
pub struct ManagerOptions {
    /// Reject a second cell with the same owner and id
    pub strict_state_ids: bool,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            strict_state_ids: true,
        }
    }
}

thread_local! {
    /// Managers with a cell write, cell read or stack inspection running on
    /// this thread
    static BUSY: RefCell<Vec<usize>> = RefCell::new(Vec::new());
}

/// Marks a manager busy on the current thread until dropped
pub(crate) struct BusyGuard {
    manager: usize,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        BUSY.with(|busy| {
            let mut busy = busy.borrow_mut();
            if let Some(pos) = busy.iter().rposition(|m| *m == self.manager) {
                busy.remove(pos);
            }
        });
    }
}

/// Process-wide anchor of the state layer
pub struct StateManager {
    session: SessionId,
    options: ManagerOptions,
    stack: Mutex<ChangeStack>,
    registry: Mutex<FxHashSet<StateKey>>,
    reporters: RwLock<Vec<Arc<dyn ChangeReporter>>>,
}

impl StateManager {
    fn with_stack(options: ManagerOptions, stack: ChangeStack) -> Self {
        Self {
            session: SessionId::new(),
            options,
            stack: Mutex::new(stack),
            registry: Mutex::new(FxHashSet::default()),
            reporters: RwLock::new(Vec::new()),
        }
    }

    /// Session this manager belongs to
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Options in effect
    pub fn options(&self) -> &ManagerOptions {
        &self.options
    }

    /// Lock the change stack
    ///
    /// Cell writes and undo/redo block while the guard is held. The lock is
    /// not reentrant; cell writes take a [`BusyGuard`] first so a nested
    /// write fails instead of blocking.
    pub(crate) fn lock_stack(&self) -> MutexGuard<'_, ChangeStack> {
        self.stack.lock()
    }

    fn address(&self) -> usize {
        self as *const Self as usize
    }

    /// Mark this manager busy on the current thread
    pub(crate) fn mark_busy(&self) -> BusyGuard {
        let manager = self.address();
        BUSY.with(|busy| busy.borrow_mut().push(manager));
        BusyGuard { manager }
    }

    /// Mark this manager busy for a write to `state`
    ///
    /// # Errors
    ///
    /// Returns `ReentrantWrite` if a write, cell read closure or stack
    /// inspection of this manager is already running on this thread.
    pub(crate) fn begin_write(&self, state: &StateKey) -> StateResult<BusyGuard> {
        let manager = self.address();
        let nested = BUSY.with(|busy| busy.borrow().contains(&manager));
        if nested {
            return Err(StateError::ReentrantWrite {
                state: state.clone(),
            });
        }
        Ok(self.mark_busy())
    }

    /// Run a read-only closure against the change stack
    ///
    /// Cell writes attempted from `f` fail with `ReentrantWrite`.
    pub fn inspect<R>(&self, f: impl FnOnce(&ChangeStack) -> R) -> R {
        let _busy = self.mark_busy();
        f(&self.stack.lock())
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Register a cell identity
    ///
    /// # Errors
    ///
    /// Returns `DuplicateState` if strict ids are enabled and the key exists.
    pub(crate) fn register(&self, key: &StateKey) -> StateResult<()> {
        let mut registry = self.registry.lock();
        if !registry.insert(key.clone()) && self.options.strict_state_ids {
            return Err(StateError::DuplicateState { key: key.clone() });
        }
        Ok(())
    }

    /// Check if a cell with this identity exists
    pub fn contains_state(&self, key: &StateKey) -> bool {
        self.registry.lock().contains(key)
    }

    /// Number of registered cells
    pub fn state_count(&self) -> usize {
        self.registry.lock().len()
    }

    // =========================================================================
    // Reporters
    // =========================================================================

    /// Register a reporter for close/undo/redo/abort notifications
    pub fn add_reporter(&self, reporter: Arc<dyn ChangeReporter>) {
        self.reporters.write().push(reporter);
    }

    /// Number of registered reporters
    pub fn reporter_count(&self) -> usize {
        self.reporters.read().len()
    }

    fn notify(&self, f: impl Fn(&dyn ChangeReporter)) {
        for reporter in self.reporters.read().iter() {
            f(reporter.as_ref());
        }
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Open a transaction; see [`ChangeStack::start_transaction`]
    pub fn start_transaction(&self) -> StateResult<ChangeSetId> {
        self.stack.lock().start_transaction()
    }

    /// Close the open transaction; see [`ChangeStack::close`]
    pub fn close(
        &self,
        action: Option<ActionDescriptor>,
        linked: bool,
    ) -> StateResult<Arc<ChangeSet>> {
        let closed = self.stack.lock().close(action, linked)?;
        self.notify(|r| r.on_close(&closed));
        Ok(closed)
    }

    /// Close and immediately open a fresh transaction
    pub fn close_and_reopen(
        &self,
        action: Option<ActionDescriptor>,
        linked: bool,
    ) -> StateResult<Arc<ChangeSet>> {
        let closed = self.stack.lock().close_and_reopen(action, linked)?;
        self.notify(|r| r.on_close(&closed));
        Ok(closed)
    }

    /// Revert and discard the open transaction; see [`ChangeStack::abort`]
    pub fn abort(&self) -> StateResult<usize> {
        let (id, reverted) = self.stack.lock().abort()?;
        self.notify(|r| r.on_abort(id, reverted));
        Ok(reverted)
    }

    /// Undo one action group; see [`ChangeStack::undo`]
    pub fn undo(&self) -> StateResult<Vec<Arc<ChangeSet>>> {
        let (undone, index) = {
            let mut stack = self.stack.lock();
            let undone = stack.undo()?;
            (undone, stack.current_index())
        };
        info!(
            session = %self.session,
            sets = undone.len(),
            index,
            "undo"
        );
        self.notify(|r| r.on_undo(&undone));
        Ok(undone)
    }

    /// Redo one action group; see [`ChangeStack::redo`]
    pub fn redo(&self) -> StateResult<Vec<Arc<ChangeSet>>> {
        let (redone, index) = {
            let mut stack = self.stack.lock();
            let redone = stack.redo()?;
            (redone, stack.current_index())
        };
        info!(
            session = %self.session,
            sets = redone.len(),
            index,
            "redo"
        );
        self.notify(|r| r.on_redo(&redone));
        Ok(redone)
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Id of the open set, if any
    pub fn current_change_set_id(&self) -> Option<ChangeSetId> {
        self.stack.lock().current_change_set().map(|s| s.id())
    }

    /// The set most recently closed, undone or redone
    pub fn previous_change_set(&self) -> Option<Arc<ChangeSet>> {
        self.stack.lock().previous_change_set().cloned()
    }

    /// Number of player actions applied
    pub fn current_index(&self) -> usize {
        self.stack.lock().current_index()
    }

    /// Check if a transaction is open
    pub fn in_transaction(&self) -> bool {
        self.stack.lock().in_transaction()
    }

    /// Check if `undo` would succeed
    pub fn can_undo(&self) -> bool {
        self.stack.lock().can_undo()
    }

    /// Check if `redo` would succeed
    pub fn can_redo(&self) -> bool {
        self.stack.lock().can_redo()
    }

    /// Every closed player action, oldest first
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.stack.lock().history()
    }
}

impl fmt::Debug for StateManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateManager")
            .field("session", &self.session)
            .field("options", &self.options)
            .field("states", &self.state_count())
            .field("reporters", &self.reporter_count())
            .finish()
    }
}

/// Cloneable handle to a session's state manager
///
/// Every cell is bound to a `Root` at creation. All clones share one
/// change stack.
///
/// # Example
///
/// ```ignore
/// let root = Root::create();
/// let floated = BooleanState::create(&root, "PRR", "floated", false)?;
///
/// root.state_manager().start_transaction()?;
/// floated.set(true)?;
/// root.state_manager().close(Some(ActionDescriptor::new("StartCompany")), false)?;
///
/// root.state_manager().undo()?;
/// assert!(!floated.value());
/// ```
#[derive(Clone, Debug)]
pub struct Root {
    manager: Arc<StateManager>,
}

impl Root {
    /// Create a root whose bootstrap set is already closed
    pub fn create() -> Self {
        Self::with_options(ManagerOptions::default())
    }

    /// Create a root with explicit options; bootstrap set closed
    pub fn with_options(options: ManagerOptions) -> Self {
        let manager = StateManager::with_stack(options, ChangeStack::bootstrapped());
        debug!(session = %manager.session, "state root created");
        Self {
            manager: Arc::new(manager),
        }
    }

    /// Create a root, run `setup` inside the bootstrap set, then close it
    ///
    /// Changes made by `setup` are permanent: the bootstrap set is never
    /// undone. If `setup` fails its changes are reverted and the error is
    /// returned.
    pub fn with_setup<F>(options: ManagerOptions, setup: F) -> StateResult<Self>
    where
        F: FnOnce(&Root) -> StateResult<()>,
    {
        let root = Self {
            manager: Arc::new(StateManager::with_stack(options, ChangeStack::new())),
        };
        if let Err(e) = setup(&root) {
            root.manager.stack.lock().abort()?;
            return Err(e);
        }
        let bootstrap = root.manager.stack.lock().close(None, false)?;
        debug!(
            session = %root.manager.session,
            changes = bootstrap.len(),
            "state root created with setup"
        );
        Ok(root)
    }

    /// The shared state manager
    pub fn state_manager(&self) -> &Arc<StateManager> {
        &self.manager
    }

    /// Run a read-only closure against the change stack
    pub fn inspect<R>(&self, f: impl FnOnce(&ChangeStack) -> R) -> R {
        self.manager.inspect(f)
    }

    /// Check if two handles share a manager
    pub fn same_root(&self, other: &Root) -> bool {
        Arc::ptr_eq(&self.manager, &other.manager)
    }
}
