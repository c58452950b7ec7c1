//! Integration tests for registration and re-buy mutations.

use poker_ledger_web::{
    add_rebuy, register_player, set_final_stack, undo_last_rebuy, LedgerError, NewPlayer,
    PlayerRecord, Skill, Team,
};

fn new_player(name: &str) -> NewPlayer {
    NewPlayer {
        name: name.to_string(),
        team: Team::Rc,
        skill: Skill::Expert,
        initial_buyin: 5000,
    }
}

fn assert_consistent(p: &PlayerRecord) {
    assert_eq!(p.rebuy_total, p.rebuy_history.iter().sum::<u64>());
    assert_eq!(p.rebuy_count as usize, p.rebuy_history.len());
}

#[test]
fn register_trims_name_and_starts_empty() {
    let p = register_player(new_player("  Tanaka  ")).unwrap();
    assert_eq!(p.name, "Tanaka");
    assert_eq!(p.initial_buyin, 5000);
    assert_eq!(p.rebuy_total, 0);
    assert_eq!(p.rebuy_count, 0);
    assert!(p.rebuy_history.is_empty());
    assert_eq!(p.final_stack, None);
    assert_eq!(p.created_at, p.updated_at);
}

#[test]
fn register_rejects_blank_name() {
    assert_eq!(register_player(new_player("   ")), Err(LedgerError::EmptyName));
    assert_eq!(register_player(new_player("")), Err(LedgerError::EmptyName));
}

#[test]
fn register_assigns_unique_ids() {
    let a = register_player(new_player("A")).unwrap();
    let b = register_player(new_player("A")).unwrap();
    assert_ne!(a.player_id, b.player_id);
}

#[test]
fn add_rebuy_requires_positive_amount() {
    let mut p = register_player(new_player("P")).unwrap();
    assert_eq!(add_rebuy(&mut p, 0), Err(LedgerError::InvalidAmount(0)));
    assert_eq!(add_rebuy(&mut p, -1000), Err(LedgerError::InvalidAmount(-1000)));
    assert_eq!(p.rebuy_total, 0);
    assert!(p.rebuy_history.is_empty());
}

#[test]
fn add_then_undo_restores_previous_state() {
    let mut p = register_player(new_player("P")).unwrap();
    add_rebuy(&mut p, 2000).unwrap();
    let before = p.clone();

    add_rebuy(&mut p, 1000).unwrap();
    assert_eq!(p.rebuy_total, 3000);
    assert_eq!(p.rebuy_count, 2);

    assert_eq!(undo_last_rebuy(&mut p), Ok(1000));
    assert_eq!(p.rebuy_total, before.rebuy_total);
    assert_eq!(p.rebuy_count, before.rebuy_count);
    assert_eq!(p.rebuy_history, before.rebuy_history);
}

#[test]
fn undo_with_empty_history_fails_without_change() {
    let mut p = register_player(new_player("P")).unwrap();
    let before = p.clone();
    assert_eq!(undo_last_rebuy(&mut p), Err(LedgerError::NothingToUndo));
    assert_eq!(p, before);
}

#[test]
fn totals_track_history_through_mixed_operations() {
    let mut p = register_player(new_player("P")).unwrap();
    let ops: [Option<i64>; 9] = [
        Some(1000),
        Some(2000),
        None,
        Some(500),
        None,
        None,
        None,
        Some(3000),
        Some(1000),
    ];
    for op in ops {
        match op {
            Some(amount) => add_rebuy(&mut p, amount).unwrap(),
            None => {
                let _ = undo_last_rebuy(&mut p);
            }
        }
        assert_consistent(&p);
    }
    assert_eq!(p.rebuy_history, vec![3000, 1000]);
}

#[test]
fn undo_clamps_desynchronised_totals_at_zero() {
    let mut p = register_player(new_player("P")).unwrap();
    // History says 5000 but totals were lost.
    p.rebuy_history = vec![5000];
    p.rebuy_total = 1000;
    p.rebuy_count = 0;

    assert_eq!(undo_last_rebuy(&mut p), Ok(5000));
    assert_eq!(p.rebuy_total, 0);
    assert_eq!(p.rebuy_count, 0);
    assert!(p.rebuy_history.is_empty());
}

#[test]
fn final_stack_can_be_overwritten_and_negative() {
    let mut p = register_player(new_player("P")).unwrap();
    set_final_stack(&mut p, 7000);
    assert_eq!(p.profit(), Some(2000));
    set_final_stack(&mut p, -500);
    assert_eq!(p.final_stack, Some(-500));
    assert_eq!(p.profit(), Some(-5500));
}
