//! LedgerError: everything a ledger operation can fail with.

use crate::models::player::PlayerId;

/// Errors that can occur during ledger operations.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum LedgerError {
    /// Re-buy amount was zero or negative.
    #[error("Re-buy amount must be positive (got {0})")]
    InvalidAmount(i64),
    /// Registration name was blank after trimming.
    #[error("Player name must not be empty")]
    EmptyName,
    /// Undo requested on a player with no active re-buys.
    #[error("No re-buy to undo")]
    NothingToUndo,
    /// No ledger row with this id.
    #[error("Player not found: {0}")]
    NotFound(PlayerId),
    /// Backend read/write failed; the mutation was abandoned.
    #[error("Ledger store unavailable: {0}")]
    StoreUnavailable(String),
}

impl LedgerError {
    /// User input errors: reported back, never fatal.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidAmount(_) | LedgerError::EmptyName | LedgerError::NothingToUndo
        )
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(e: std::io::Error) -> Self {
        LedgerError::StoreUnavailable(e.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(e: csv::Error) -> Self {
        LedgerError::StoreUnavailable(e.to_string())
    }
}
