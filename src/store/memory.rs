//! In-process ledger store for tests and local demos.

use crate::models::{LedgerError, PlayerId, PlayerRecord};
use crate::store::{apply_updates, sort_by_registration, FieldUpdate, LedgerStore};
use chrono::Utc;
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    rows: RwLock<Vec<PlayerRecord>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `records` (kept in the given order).
    pub fn with_records(records: Vec<PlayerRecord>) -> Self {
        Self {
            rows: RwLock::new(records),
        }
    }
}

fn lock_error() -> LedgerError {
    LedgerError::StoreUnavailable("lock error".to_string())
}

impl LedgerStore for MemoryLedgerStore {
    fn list(&self) -> Result<Vec<PlayerRecord>, LedgerError> {
        let mut rows = self.rows.read().map_err(|_| lock_error())?.clone();
        sort_by_registration(&mut rows);
        Ok(rows)
    }

    fn append(&self, record: PlayerRecord) -> Result<(), LedgerError> {
        self.rows.write().map_err(|_| lock_error())?.push(record);
        Ok(())
    }

    fn update_fields(&self, id: PlayerId, updates: &[FieldUpdate]) -> Result<(), LedgerError> {
        let mut rows = self.rows.write().map_err(|_| lock_error())?;
        let row = rows
            .iter_mut()
            .find(|r| r.player_id == id)
            .ok_or(LedgerError::NotFound(id))?;
        apply_updates(row, updates, Utc::now());
        Ok(())
    }

    fn delete(&self, id: PlayerId) -> Result<(), LedgerError> {
        let mut rows = self.rows.write().map_err(|_| lock_error())?;
        let idx = rows
            .iter()
            .position(|r| r.player_id == id)
            .ok_or(LedgerError::NotFound(id))?;
        rows.remove(idx);
        Ok(())
    }

    fn reset_all(&self) -> Result<(), LedgerError> {
        self.rows.write().map_err(|_| lock_error())?.clear();
        Ok(())
    }
}
