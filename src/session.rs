//! Main session entry point for railstate.
//!
//! This module provides the `GameSession` struct, the primary entry point
//! for rule code: it creates tracked cells, delimits player actions and
//! drives undo/redo.

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use railstate_core::{ActionDescriptor, ChangeSetId, OwnerId, SessionId, StateError, StateId, StateValue};
use railstate_state::{
    ChangeReporter, ChangeSet, HistoryEntry, ManagerOptions, Root, StateCell, StateManager,
    TracingReporter,
};
use std::sync::Arc;
use tracing::{info, info_span, warn};

/// A running game session.
///
/// Owns one state root (and thereby one change stack). Create a session
/// with [`GameSession::new`] or [`GameSession::builder`].
///
/// # Example
///
/// ```ignore
/// use railstate::prelude::*;
///
/// let game = GameSession::new()?;
/// let cash = game.cell("PRR", "cash", 0i64)?;
///
/// game.execute(ActionDescriptor::new("Float"), false, |_| {
///     cash.set(400)?;
///     Ok(())
/// })?;
///
/// game.undo()?;
/// assert_eq!(cash.value(), 0);
/// ```
pub struct GameSession {
    root: Root,
    config: SessionConfig,
}

impl GameSession {
    /// Create a session with default settings.
    pub fn new() -> Result<Self> {
        Self::from_config(SessionConfig::default())
    }

    /// Create a session from a configuration.
    pub fn from_config(config: SessionConfig) -> Result<Self> {
        GameSessionBuilder::from_config(config).build()
    }

    /// Create a builder for session configuration.
    pub fn builder() -> GameSessionBuilder {
        GameSessionBuilder::new()
    }

    fn from_root(root: Root, config: SessionConfig) -> Result<Self> {
        let session = Self { root, config };
        if session.config.auto_reopen {
            session.root.state_manager().start_transaction()?;
        }
        info!(
            name = %session.config.name,
            session = %session.id(),
            "game session started"
        );
        Ok(session)
    }

    /// Session identifier.
    pub fn id(&self) -> SessionId {
        self.root.state_manager().session()
    }

    /// Configuration in effect.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The state root cells are bound to.
    pub fn root(&self) -> &Root {
        &self.root
    }

    fn manager(&self) -> &Arc<StateManager> {
        self.root.state_manager()
    }

    /// Register an additional change reporter.
    pub fn add_reporter(&self, reporter: Arc<dyn ChangeReporter>) {
        self.manager().add_reporter(reporter);
    }

    // =========================================================================
    // Cells
    // =========================================================================

    /// Create a tracked cell.
    pub fn cell<T: StateValue>(
        &self,
        owner: impl Into<OwnerId>,
        id: impl Into<StateId>,
        initial: T,
    ) -> Result<StateCell<T>> {
        Ok(StateCell::create(&self.root, owner, id, initial)?)
    }

    /// Create a tracked cell holding `T::default()`.
    pub fn cell_default<T: StateValue + Default>(
        &self,
        owner: impl Into<OwnerId>,
        id: impl Into<StateId>,
    ) -> Result<StateCell<T>> {
        Ok(StateCell::create_default(&self.root, owner, id)?)
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Open a transaction for the next player action.
    pub fn begin(&self) -> Result<ChangeSetId> {
        Ok(self.manager().start_transaction()?)
    }

    /// Close the open transaction as one undoable action.
    ///
    /// With `auto_reopen` a fresh transaction is opened immediately.
    pub fn commit(&self, action: ActionDescriptor, linked: bool) -> Result<Arc<ChangeSet>> {
        let manager = self.manager();
        let closed = if self.config.auto_reopen {
            manager.close_and_reopen(Some(action), linked)?
        } else {
            manager.close(Some(action), linked)?
        };
        Ok(closed)
    }

    /// Revert and discard the open transaction.
    ///
    /// Returns the number of reverted changes. Redo history is kept.
    pub fn abort(&self) -> Result<usize> {
        let reverted = self.manager().abort()?;
        self.reopen_if_configured()?;
        Ok(reverted)
    }

    /// Run one player action as a transaction.
    ///
    /// Opens a transaction (or reuses the empty one left by `auto_reopen`),
    /// runs `f`, then commits on `Ok` or aborts on `Err`. A rejected action
    /// leaves every cell and the redo history exactly as they were.
    ///
    /// # Errors
    ///
    /// - `TransactionInProgress` if a transaction with changes is already open
    /// - whatever `f` returns; the transaction is aborted first
    pub fn execute<R, F>(&self, action: ActionDescriptor, linked: bool, f: F) -> Result<R>
    where
        F: FnOnce(&GameSession) -> Result<R>,
    {
        let span = info_span!("action", name = %action.name, session = %self.id());
        let _guard = span.enter();

        let pending = self.root.inspect(|stack| {
            stack
                .current_change_set()
                .map(|open| (open.id(), open.len()))
        });
        match pending {
            Some((change_set, changes)) if changes > 0 => {
                return Err(StateError::TransactionInProgress {
                    change_set,
                    changes,
                }
                .into());
            }
            Some(_) => {}
            None => {
                self.manager().start_transaction()?;
            }
        }

        match f(self) {
            Ok(result) => {
                self.commit(action, linked)?;
                Ok(result)
            }
            Err(e) => {
                warn!(error = %e, "action failed; reverting");
                if let Err(abort_error) = self.abort() {
                    warn!(error = %abort_error, "abort after failed action also failed");
                }
                Err(e)
            }
        }
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Undo the newest action (with every action linked to it).
    pub fn undo(&self) -> Result<Vec<Arc<ChangeSet>>> {
        let undone = self.manager().undo()?;
        self.reopen_if_configured()?;
        Ok(undone)
    }

    /// Redo the next undone action (with every action linked to it).
    pub fn redo(&self) -> Result<Vec<Arc<ChangeSet>>> {
        let redone = self.manager().redo()?;
        self.reopen_if_configured()?;
        Ok(redone)
    }

    fn reopen_if_configured(&self) -> Result<()> {
        if self.config.auto_reopen && !self.manager().in_transaction() {
            self.manager().start_transaction()?;
        }
        Ok(())
    }

    /// Check if `undo` would succeed.
    pub fn can_undo(&self) -> bool {
        self.manager().can_undo()
    }

    /// Check if `redo` would succeed.
    pub fn can_redo(&self) -> bool {
        self.manager().can_redo()
    }

    /// Number of player actions currently applied.
    pub fn current_index(&self) -> usize {
        self.manager().current_index()
    }

    /// The set most recently closed, undone or redone.
    pub fn previous_change_set(&self) -> Option<Arc<ChangeSet>> {
        self.manager().previous_change_set()
    }

    /// Every closed player action, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.manager().history()
    }

    /// Render the history as JSON, for UI layers and logs.
    pub fn history_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.history())?)
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("name", &self.config.name)
            .field("session", &self.id())
            .field("index", &self.current_index())
            .finish()
    }
}

/// Builder for session configuration.
///
/// # Example
///
/// ```ignore
/// let game = GameSession::builder()
///     .name("1856")
///     .auto_reopen(true)
///     .setup(|root| {
///         let phase = StringState::create(root, "root", "phase", "2".to_string())?;
///         phase.set("2+".to_string())?;
///         Ok(())
///     })
///     .build()?;
/// ```
pub struct GameSessionBuilder {
    config: SessionConfig,
    reporters: Vec<Arc<dyn ChangeReporter>>,
    setup: Option<SetupFn>,
}

type SetupFn = Box<dyn FnOnce(&Root) -> std::result::Result<(), StateError>>;

impl GameSessionBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::from_config(SessionConfig::default())
    }

    /// Start from an existing configuration.
    pub fn from_config(config: SessionConfig) -> Self {
        Self {
            config,
            reporters: Vec::new(),
            setup: None,
        }
    }

    /// Set the session name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Open a fresh transaction right after each commit, undo and redo.
    pub fn auto_reopen(mut self, enabled: bool) -> Self {
        self.config.auto_reopen = enabled;
        self
    }

    /// Log change stack activity through `tracing`.
    pub fn trace_changes(mut self, enabled: bool) -> Self {
        self.config.trace_changes = enabled;
        self
    }

    /// Reject duplicate `(owner, id)` registrations.
    pub fn strict_state_ids(mut self, enabled: bool) -> Self {
        self.config.strict_state_ids = enabled;
        self
    }

    /// Register a change reporter.
    pub fn reporter(mut self, reporter: Arc<dyn ChangeReporter>) -> Self {
        self.reporters.push(reporter);
        self
    }

    /// Run `setup` inside the bootstrap set.
    ///
    /// Its changes are permanent: the bootstrap set is never undone.
    pub fn setup<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&Root) -> std::result::Result<(), StateError> + 'static,
    {
        self.setup = Some(Box::new(setup));
        self
    }

    /// Build the session.
    pub fn build(self) -> Result<GameSession> {
        self.config.validate()?;
        let options = ManagerOptions {
            strict_state_ids: self.config.strict_state_ids,
        };
        let root = match self.setup {
            Some(setup) => Root::with_setup(options, setup).map_err(Error::from)?,
            None => Root::with_options(options),
        };

        let manager = root.state_manager();
        if self.config.trace_changes {
            manager.add_reporter(Arc::new(TracingReporter));
        }
        for reporter in self.reporters {
            manager.add_reporter(reporter);
        }

        GameSession::from_root(root, self.config)
    }
}

impl Default for GameSessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
