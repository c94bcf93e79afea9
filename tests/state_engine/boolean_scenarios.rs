//! Boolean Cell Scenarios
//!
//! A single boolean cell driven through two actions and then walked back
//! and forth across the history:
//! - undo down to the bootstrap boundary
//! - redo up to the tip
//! - repeated writes inside one transaction

use crate::*;

/// Build the two-action history: true -> false -> true
fn two_actions() -> (GameSession, BooleanState) {
    let game = quiet_session();
    let flag = game.cell("Alice", "hasPassed", true).unwrap();
    write_action(&game, "Pass", &flag, false);
    write_action(&game, "Bid", &flag, true);
    (game, flag)
}

/// Two closed actions move the index to 2
#[test]
fn test_two_actions_reach_index_two() {
    let (game, flag) = two_actions();

    assert_eq!(game.current_index(), 2);
    assert!(flag.value());
    assert_eq!(game.history().len(), 2);
}

/// One undo restores the value of the previous action
#[test]
fn test_undo_once() {
    let (game, flag) = two_actions();

    game.undo().unwrap();

    assert!(!flag.value());
    assert_eq!(game.current_index(), 1);
    let previous = game.previous_change_set().unwrap();
    assert_eq!(previous.action().unwrap().name, "Bid");
}

/// Two undos restore the initial value
#[test]
fn test_undo_twice() {
    let (game, flag) = two_actions();

    game.undo().unwrap();
    game.undo().unwrap();

    assert!(flag.value());
    assert_eq!(game.current_index(), 0);
    assert_eq!(game.previous_change_set().unwrap().action().unwrap().name, "Pass");
}

/// Undo never crosses the bootstrap set
#[test]
fn test_undo_past_bootstrap_fails() {
    let (game, flag) = two_actions();
    game.undo().unwrap();
    game.undo().unwrap();

    let err = game.undo().unwrap_err();

    assert!(err.is_invalid_state());
    assert!(matches!(
        err,
        Error::State(StateError::NothingToUndo { index: 0 })
    ));
    assert!(flag.value());
    assert_eq!(game.current_index(), 0);
    assert!(!game.can_undo());
}

/// Redo walks forward one action at a time and stops at the tip
#[test]
fn test_redo_to_tip() {
    let (game, flag) = two_actions();
    game.undo().unwrap();
    game.undo().unwrap();

    game.redo().unwrap();
    assert!(!flag.value());
    assert_eq!(game.current_index(), 1);

    game.redo().unwrap();
    assert!(flag.value());
    assert_eq!(game.current_index(), 2);

    let err = game.redo().unwrap_err();
    assert!(err.is_invalid_state());
    assert!(flag.value());
    assert_eq!(game.current_index(), 2);
}

/// Undo of several writes restores the value from before the transaction
#[test]
fn test_repeated_writes_undo_to_pre_transaction_value() {
    let game = quiet_session();
    let flag = game.cell("Alice", "hasPassed", true).unwrap();
    write_action(&game, "Pass", &flag, false);

    game.begin().unwrap();
    flag.set(false).unwrap();
    flag.set(true).unwrap();
    flag.set(false).unwrap();
    let closed = game.commit(ActionDescriptor::new("Dither"), false).unwrap();
    assert_eq!(closed.len(), 2);

    game.undo().unwrap();
    assert!(!flag.value());

    game.undo().unwrap();
    assert!(flag.value());
}

/// Writing the current value records nothing
#[test]
fn test_equal_write_is_noop() {
    let game = quiet_session();
    let flag = game.cell("Alice", "hasPassed", true).unwrap();

    game.begin().unwrap();
    assert!(!flag.set(true).unwrap());
    let closed = game.commit(ActionDescriptor::new("Nothing"), false).unwrap();

    assert!(closed.is_empty());
    assert_eq!(game.current_index(), 1);
}

/// Toggle flips the value and is undoable
#[test]
fn test_toggle() {
    let game = quiet_session();
    let floated: BooleanState = game.cell_default("PRR", "floated").unwrap();

    game.execute(ActionDescriptor::new("Float"), false, |_| {
        floated.toggle()?;
        Ok(())
    })
    .unwrap();
    assert!(floated.value());

    game.undo().unwrap();
    assert!(!floated.value());
}
