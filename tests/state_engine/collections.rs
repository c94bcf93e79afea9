//! Collection Cell Tests
//!
//! Set, list and multimap cells written together with scalar cells inside
//! one action, then undone and redone as a unit.

use crate::*;

/// Buying a train touches cash, the train pool and the company's trains
#[test]
fn test_buy_train_across_cell_types() {
    let game = quiet_session();
    let cash = game.cell("PRR", "cash", 500i64).unwrap();
    let pool: ListState<String> = game.cell_default("Bank", "pool").unwrap();
    let owned: ListState<String> = game.cell_default("PRR", "trains").unwrap();

    game.execute(ActionDescriptor::new("Setup"), false, |_| {
        pool.push("2".to_string())?;
        pool.push("2".to_string())?;
        pool.push("3".to_string())?;
        Ok(())
    })
    .unwrap();

    game.execute(
        ActionDescriptor::new("BuyTrain").with_actor("PRR"),
        false,
        |_| {
            let train = pool.remove_at(0)?.ok_or_else(|| Error::action("pool empty"))?;
            owned.push(train)?;
            cash.add(-80)?;
            Ok(())
        },
    )
    .unwrap();

    assert_eq!(pool.len(), 2);
    assert_eq!(owned.get(0), Some("2".to_string()));
    assert_eq!(cash.value(), 420);

    game.undo().unwrap();
    assert_eq!(pool.len(), 3);
    assert!(owned.is_empty());
    assert_eq!(cash.value(), 500);

    game.redo().unwrap();
    assert_eq!(owned.len(), 1);
}

/// Tokens on hexes tracked as a multimap
#[test]
fn test_token_placement() {
    let game = quiet_session();
    let tokens: MultimapState<String, String> = game.cell_default("Map", "tokens").unwrap();
    let sold: SetState<String> = game.cell_default("Alice", "soldThisRound").unwrap();

    game.execute(ActionDescriptor::new("LayToken"), false, |_| {
        tokens.put("F2".to_string(), "PRR".to_string())?;
        Ok(())
    })
    .unwrap();
    game.execute(ActionDescriptor::new("SellShares"), false, |_| {
        sold.add("PRR".to_string())?;
        tokens.put("F2".to_string(), "NYC".to_string())?;
        Ok(())
    })
    .unwrap();

    assert_eq!(tokens.get(&"F2".to_string()).len(), 2);
    assert!(sold.contains(&"PRR".to_string()));

    game.undo().unwrap();
    assert_eq!(tokens.size(), 1);
    assert!(sold.is_empty());

    game.undo().unwrap();
    assert_eq!(tokens.size(), 0);
    assert!(!tokens.contains_key(&"F2".to_string()));
}

/// A rejected action leaves collections untouched
#[test]
fn test_rejected_action_restores_collections() {
    let game = quiet_session();
    let sold: SetState<u32> = game.cell_default("Alice", "sold").unwrap();

    let result = game.execute(ActionDescriptor::new("SellShares"), false, |_| -> Result<()> {
        sold.add(1)?;
        sold.add(2)?;
        Err(Error::action("cannot sell in the first stock round"))
    });

    assert!(result.unwrap_err().is_action_rejected());
    assert!(sold.is_empty());
    assert_eq!(game.current_index(), 0);
}

/// String cells append and undo
#[test]
fn test_string_append() {
    let game = quiet_session();
    let log: StringState = game.cell_default("Game", "log").unwrap();

    write_action(&game, "Start", &log, "SR1".to_string());
    game.execute(ActionDescriptor::new("Append"), false, |_| {
        log.append(" OR1.1")?;
        Ok(())
    })
    .unwrap();
    assert_eq!(log.value(), "SR1 OR1.1");

    game.undo().unwrap();
    assert_eq!(log.value(), "SR1");
}
