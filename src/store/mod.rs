//! Ledger storage: the `LedgerStore` contract and its implementations.

mod csv_file;
mod memory;

pub use csv_file::CsvLedgerStore;
pub use memory::MemoryLedgerStore;

use crate::models::{LedgerError, PlayerId, PlayerRecord};
use chrono::{DateTime, Utc};

/// The fields a stored row may change after registration.
///
/// Name, team, skill, buy-in and `created_at` are fixed at creation and have no variant here.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldUpdate {
    RebuyTotal(u64),
    RebuyCount(u32),
    RebuyHistory(Vec<u64>),
    FinalStack(Option<i64>),
}

impl FieldUpdate {
    /// The re-buy fields of `record`, always written together.
    pub fn rebuys_of(record: &PlayerRecord) -> Vec<FieldUpdate> {
        vec![
            FieldUpdate::RebuyTotal(record.rebuy_total),
            FieldUpdate::RebuyCount(record.rebuy_count),
            FieldUpdate::RebuyHistory(record.rebuy_history.clone()),
        ]
    }

    fn apply(&self, record: &mut PlayerRecord) {
        match self {
            FieldUpdate::RebuyTotal(v) => record.rebuy_total = *v,
            FieldUpdate::RebuyCount(v) => record.rebuy_count = *v,
            FieldUpdate::RebuyHistory(v) => record.rebuy_history = v.clone(),
            FieldUpdate::FinalStack(v) => record.final_stack = *v,
        }
    }
}

/// Apply `updates` to `record` and stamp `updated_at`.
pub(crate) fn apply_updates(record: &mut PlayerRecord, updates: &[FieldUpdate], now: DateTime<Utc>) {
    for update in updates {
        update.apply(record);
    }
    record.updated_at = now;
}

/// Durable mapping from player id to player record.
pub trait LedgerStore: Send + Sync {
    /// All records, ascending `created_at` (storage order for equal timestamps).
    fn list(&self) -> Result<Vec<PlayerRecord>, LedgerError>;

    /// One record by id.
    fn get(&self, id: PlayerId) -> Result<PlayerRecord, LedgerError> {
        self.list()?
            .into_iter()
            .find(|r| r.player_id == id)
            .ok_or(LedgerError::NotFound(id))
    }

    fn append(&self, record: PlayerRecord) -> Result<(), LedgerError>;

    /// Change some fields of one row and refresh its `updated_at`. Unknown id is `NotFound`.
    fn update_fields(&self, id: PlayerId, updates: &[FieldUpdate]) -> Result<(), LedgerError>;

    /// Remove one row. Unknown id is `NotFound`.
    fn delete(&self, id: PlayerId) -> Result<(), LedgerError>;

    /// Drop every row. Irreversible.
    fn reset_all(&self) -> Result<(), LedgerError>;
}

/// Sort by `created_at`, keeping storage order on ties.
pub(crate) fn sort_by_registration(records: &mut [PlayerRecord]) {
    records.sort_by_key(|r| r.created_at);
}
