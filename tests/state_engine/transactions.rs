//! Transaction Boundary Tests
//!
//! Tests for the transaction protocol:
//! - writes outside a transaction
//! - double open, close without open
//! - undo/redo while a transaction holds changes
//! - abort and redo truncation

use crate::*;

/// A write with no open transaction fails and leaves the value alone
#[test]
fn test_write_without_transaction_fails() {
    let game = quiet_session();
    let cash = game.cell("PRR", "cash", 100i64).unwrap();

    let err = cash.set(50).unwrap_err();

    assert!(matches!(err, StateError::NoOpenTransaction { .. }));
    assert!(err.to_string().contains("PRR.cash"));
    assert_eq!(cash.value(), 100);
}

/// Only one transaction can be open at a time
#[test]
fn test_double_begin_fails() {
    let game = quiet_session();
    game.begin().unwrap();

    let err = game.begin().unwrap_err();
    assert!(err.is_invalid_operation());
    assert!(matches!(
        err,
        Error::State(StateError::TransactionAlreadyOpen { .. })
    ));
}

/// Closing with nothing open fails
#[test]
fn test_commit_without_begin_fails() {
    let game = quiet_session();

    let err = game.commit(ActionDescriptor::new("Pass"), false).unwrap_err();
    assert!(matches!(err, Error::State(StateError::NoTransaction)));
}

/// Undo is refused while the open transaction holds changes
#[test]
fn test_undo_with_pending_changes_fails() {
    let game = quiet_session();
    let cash = game.cell("PRR", "cash", 0i64).unwrap();
    write_action(&game, "Income", &cash, 10);

    game.begin().unwrap();
    cash.set(20).unwrap();

    let err = game.undo().unwrap_err();
    assert!(matches!(
        err,
        Error::State(StateError::TransactionInProgress { changes: 1, .. })
    ));
    assert_eq!(cash.value(), 20);
    assert_eq!(game.current_index(), 1);
}

/// An empty open transaction is discarded by undo
#[test]
fn test_undo_discards_empty_transaction() {
    let game = quiet_session();
    let cash = game.cell("PRR", "cash", 0i64).unwrap();
    write_action(&game, "Income", &cash, 10);

    game.begin().unwrap();
    game.undo().unwrap();

    assert_eq!(cash.value(), 0);
    assert!(!game.root().state_manager().in_transaction());
}

/// A failing undo keeps the empty open transaction
#[test]
fn test_failed_undo_keeps_empty_transaction() {
    let game = quiet_session();
    game.begin().unwrap();

    assert!(game.undo().is_err());
    assert!(game.root().state_manager().in_transaction());
}

/// Abort reverts the open set in reverse order
#[test]
fn test_abort_reverts_open_changes() {
    let game = quiet_session();
    let cash = game.cell("PRR", "cash", 100i64).unwrap();
    let president = game.cell("PRR", "president", "Alice".to_string()).unwrap();

    game.begin().unwrap();
    cash.add(-30).unwrap();
    cash.add(-30).unwrap();
    president.set("Bob".to_string()).unwrap();

    assert_eq!(game.abort().unwrap(), 3);
    assert_eq!(cash.value(), 100);
    assert_eq!(president.value(), "Alice");
    assert_eq!(game.current_index(), 0);
    assert!(game.history().is_empty());
}

/// A new action after undo discards redo history
#[test]
fn test_new_action_truncates_redo() {
    let game = quiet_session();
    let cash = game.cell("PRR", "cash", 0i64).unwrap();
    write_action(&game, "A", &cash, 1);
    write_action(&game, "B", &cash, 2);
    write_action(&game, "C", &cash, 3);

    game.undo().unwrap();
    game.undo().unwrap();
    assert!(game.can_redo());

    write_action(&game, "D", &cash, 9);

    assert!(!game.can_redo());
    assert_eq!(game.current_index(), 2);
    let names: Vec<String> = game
        .history()
        .into_iter()
        .filter_map(|entry| entry.action.map(|a| a.name))
        .collect();
    assert_eq!(names, vec!["A".to_string(), "D".to_string()]);

    game.undo().unwrap();
    assert_eq!(cash.value(), 1);
}

/// An aborted action keeps redo history
#[test]
fn test_abort_keeps_redo() {
    let game = quiet_session();
    let cash = game.cell("PRR", "cash", 0i64).unwrap();
    write_action(&game, "A", &cash, 1);
    game.undo().unwrap();

    game.begin().unwrap();
    cash.set(7).unwrap();
    game.abort().unwrap();

    assert!(game.can_redo());
    game.redo().unwrap();
    assert_eq!(cash.value(), 1);
}

/// History marks undone actions as not applied
#[test]
fn test_history_tracks_applied() {
    let game = quiet_session();
    let cash = game.cell("PRR", "cash", 0i64).unwrap();
    write_action(&game, "A", &cash, 1);
    write_action(&game, "B", &cash, 2);
    game.undo().unwrap();

    let history = game.history();
    assert_eq!(history.len(), 2);
    assert!(history[0].applied);
    assert!(!history[1].applied);
    assert_eq!(history[1].index, 2);
    assert_eq!(history[1].changes, 1);
}

/// Every touched cell is listed by the closed set
#[test]
fn test_change_set_states() {
    let game = quiet_session();
    let cash = game.cell("PRR", "cash", 0i64).unwrap();
    let trains = game.cell("PRR", "trains", 0i64).unwrap();

    game.begin().unwrap();
    cash.set(-80).unwrap();
    trains.set(1).unwrap();
    cash.set(-160).unwrap();
    let closed = game.commit(ActionDescriptor::new("BuyTrain"), false).unwrap();

    assert_eq!(closed.len(), 3);
    let states: Vec<String> = closed.states().iter().map(|k| k.to_string()).collect();
    assert_eq!(states, vec!["PRR.cash".to_string(), "PRR.trains".to_string()]);
    assert!(closed.contains_state(trains.key()));
}

/// Duplicate cell identities are rejected by default
#[test]
fn test_duplicate_state_rejected() {
    let game = quiet_session();
    game.cell("PRR", "cash", 0i64).unwrap();

    let err = game.cell("PRR", "cash", 5i64).unwrap_err();
    assert!(matches!(
        err,
        Error::State(StateError::DuplicateState { .. })
    ));
}

/// Duplicate identities are allowed when strict ids are off
#[test]
fn test_duplicate_state_allowed_when_lenient() {
    let game = GameSession::builder()
        .trace_changes(false)
        .strict_state_ids(false)
        .build()
        .unwrap();
    game.cell("PRR", "cash", 0i64).unwrap();
    assert!(game.cell("PRR", "cash", 5i64).is_ok());
}
