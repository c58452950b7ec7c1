//! Registration: turn form input into a fresh ledger row.

use crate::models::{LedgerError, NewPlayer, PlayerRecord};
use chrono::Utc;

/// Validate and build a new player record. The name is trimmed and must not be blank.
pub fn register_player(input: NewPlayer) -> Result<PlayerRecord, LedgerError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(LedgerError::EmptyName);
    }
    Ok(PlayerRecord::new(
        name,
        input.team,
        input.skill,
        input.initial_buyin,
        Utc::now(),
    ))
}
