//! Linked Group Tests
//!
//! A linked action undoes and redoes together with its predecessor. Models
//! cascades such as a merger that forces several follow-up decisions.

use crate::*;

/// Merger followed by two forced follow-ups, all linked
fn merger_cascade() -> (GameSession, IntegerState, BooleanState, IntegerState) {
    let game = quiet_session();
    let shares = game.cell("Alice", "shares", 2i64).unwrap();
    let merged = game.cell("CGR", "formed", false).unwrap();
    let trains = game.cell("CGR", "trains", 3i64).unwrap();

    write_action(&game, "BuyShare", &shares, 3);

    game.execute(ActionDescriptor::new("Merge"), false, |_| {
        merged.set(true)?;
        Ok(())
    })
    .unwrap();
    game.execute(ActionDescriptor::new("ExchangeShares"), true, |_| {
        shares.set(1)?;
        Ok(())
    })
    .unwrap();
    game.execute(ActionDescriptor::new("DiscardTrain"), true, |_| {
        trains.add(-1)?;
        Ok(())
    })
    .unwrap();

    (game, shares, merged, trains)
}

/// The whole cascade undoes in one step
#[test]
fn test_linked_group_undoes_together() {
    let (game, shares, merged, trains) = merger_cascade();
    assert_eq!(game.current_index(), 4);

    let undone = game.undo().unwrap();

    assert_eq!(undone.len(), 3);
    assert_eq!(undone[0].action().unwrap().name, "DiscardTrain");
    assert_eq!(undone[2].action().unwrap().name, "Merge");
    assert_eq!(game.current_index(), 1);
    assert_eq!(shares.value(), 3);
    assert!(!merged.value());
    assert_eq!(trains.value(), 3);
}

/// The whole cascade redoes in one step
#[test]
fn test_linked_group_redoes_together() {
    let (game, shares, merged, trains) = merger_cascade();
    game.undo().unwrap();

    let redone = game.redo().unwrap();

    assert_eq!(redone.len(), 3);
    assert_eq!(redone[0].action().unwrap().name, "Merge");
    assert_eq!(game.current_index(), 4);
    assert_eq!(shares.value(), 1);
    assert!(merged.value());
    assert_eq!(trains.value(), 2);
    assert!(!game.can_redo());
}

/// Undo after the cascade stops at the unlinked action before it
#[test]
fn test_unlinked_predecessor_undoes_alone() {
    let (game, shares, _, _) = merger_cascade();
    game.undo().unwrap();

    let undone = game.undo().unwrap();

    assert_eq!(undone.len(), 1);
    assert_eq!(shares.value(), 2);
    assert_eq!(game.current_index(), 0);
}

/// A link right after bootstrap never pulls the bootstrap set in
#[test]
fn test_link_to_bootstrap_undoes_alone() {
    let game = quiet_session();
    let cash = game.cell("PRR", "cash", 0i64).unwrap();

    game.execute(ActionDescriptor::new("First"), true, |_| {
        cash.set(10)?;
        Ok(())
    })
    .unwrap();

    let undone = game.undo().unwrap();
    assert_eq!(undone.len(), 1);
    assert_eq!(cash.value(), 0);
    assert!(game.undo().unwrap_err().is_invalid_state());
}

/// The previous change set after undoing a group is its newest member
#[test]
fn test_previous_change_set_after_group_undo() {
    let (game, _, _, _) = merger_cascade();

    game.undo().unwrap();

    let previous = game.previous_change_set().unwrap();
    assert_eq!(previous.action().unwrap().name, "DiscardTrain");
    assert!(previous.is_linked());
}

/// Redo stops where the next unlinked action begins
#[test]
fn test_redo_stops_at_unlinked_boundary() {
    let game = quiet_session();
    let step = game.cell("Game", "step", 0i64).unwrap();
    write_action(&game, "A", &step, 1);
    game.execute(ActionDescriptor::new("B"), true, |_| {
        step.set(2)?;
        Ok(())
    })
    .unwrap();
    write_action(&game, "C", &step, 3);

    game.undo().unwrap();
    game.undo().unwrap();
    assert_eq!(step.value(), 0);

    let redone = game.redo().unwrap();
    assert_eq!(redone.len(), 2);
    assert_eq!(step.value(), 2);

    let redone = game.redo().unwrap();
    assert_eq!(redone.len(), 1);
    assert_eq!(step.value(), 3);
}
