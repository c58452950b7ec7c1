//! Re-buy and final-stack mutations on a single record (no storage).

use crate::models::{LedgerError, PlayerRecord};

/// Append a re-buy. `amount` must be positive.
pub fn add_rebuy(record: &mut PlayerRecord, amount: i64) -> Result<(), LedgerError> {
    if amount <= 0 {
        return Err(LedgerError::InvalidAmount(amount));
    }
    let amount = amount as u64;
    record.rebuy_history.push(amount);
    record.rebuy_total = record.rebuy_total.saturating_add(amount);
    record.rebuy_count = record.rebuy_count.saturating_add(1);
    Ok(())
}

/// Pop the most recent re-buy and return its amount.
///
/// Totals that would go negative are clamped to zero; that only happens when
/// totals and history have drifted apart, so it is logged as an error.
pub fn undo_last_rebuy(record: &mut PlayerRecord) -> Result<u64, LedgerError> {
    let last = record.rebuy_history.pop().ok_or(LedgerError::NothingToUndo)?;

    record.rebuy_total = match record.rebuy_total.checked_sub(last) {
        Some(total) => total,
        None => {
            log::error!(
                "Invariant violation for player {}: rebuy_total {} < undone amount {}; clamping to 0",
                record.player_id,
                record.rebuy_total,
                last
            );
            0
        }
    };
    record.rebuy_count = match record.rebuy_count.checked_sub(1) {
        Some(count) => count,
        None => {
            log::error!(
                "Invariant violation for player {}: rebuy_count already 0 with non-empty history; clamping to 0",
                record.player_id
            );
            0
        }
    };
    Ok(last)
}

/// Set (or overwrite) the chips the player left with. Negative stacks are allowed.
pub fn set_final_stack(record: &mut PlayerRecord, stack: i64) {
    record.final_stack = Some(stack);
}
