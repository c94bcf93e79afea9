//! State Engine Test Suite
//!
//! End-to-end tests for transactional game state: cells, transaction
//! boundaries, undo/redo over linked groups, and the session facade.
//!
//! ## Running Tests
//!
//! ```bash
//! # Run the whole suite
//! cargo test --test state_engine
//!
//! # Run the boolean cell scenarios only
//! cargo test --test state_engine boolean_scenarios::
//! ```

use railstate::prelude::*;
use railstate::{ChangeEvent, RecordingReporter, StateError, StateValue};
use std::sync::Arc;

// Test modules
pub mod boolean_scenarios;
pub mod collections;
pub mod linked_groups;
pub mod transactions;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Create a session without the tracing reporter
pub fn quiet_session() -> GameSession {
    GameSession::builder()
        .name("test")
        .trace_changes(false)
        .build()
        .expect("Failed to create session")
}

/// Create a session that records every change stack event
pub fn recorded_session() -> (GameSession, Arc<RecordingReporter>) {
    let recorder = Arc::new(RecordingReporter::new());
    let session = GameSession::builder()
        .name("recorded")
        .trace_changes(false)
        .reporter(recorder.clone())
        .build()
        .expect("Failed to create session");
    (session, recorder)
}

/// Run one unlinked action that writes `value` into `cell`
pub fn write_action<T: StateValue>(game: &GameSession, name: &str, cell: &StateCell<T>, value: T) {
    game.execute(ActionDescriptor::new(name), false, |_| {
        cell.set(value)?;
        Ok(())
    })
    .expect("action failed");
}

/// Install a test-writer subscriber (first call wins)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
