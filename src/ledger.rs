//! Ledger service: the handle the web layer holds.
//!
//! All mutations run under one mutex and go straight to the store. Reads are
//! served from a snapshot cache that expires after `cache_ttl` and is dropped
//! by every mutation before the write lock is released, so a caller always
//! sees its own writes.

use crate::logic::{
    add_rebuy, compute_progress, compute_settlement, register_player, set_final_stack,
    undo_last_rebuy,
};
use crate::models::{LedgerError, NewPlayer, PlayerId, PlayerRecord, Progress, Settlement};
use crate::store::{FieldUpdate, LedgerStore};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

/// Cached `list()` result and when it was read.
struct CachedSnapshot {
    records: Arc<Vec<PlayerRecord>>,
    loaded_at: Instant,
}

#[derive(Default)]
struct CacheState {
    snapshot: Option<CachedSnapshot>,
    /// Bumped on every invalidation; a load started under an older
    /// generation must not be cached.
    generation: u64,
}

pub struct Ledger {
    store: Arc<dyn LedgerStore>,
    cache_ttl: Duration,
    cache: RwLock<CacheState>,
    write_lock: Mutex<()>,
}

fn lock_error() -> LedgerError {
    LedgerError::StoreUnavailable("lock error".to_string())
}

impl Ledger {
    pub fn new(store: Arc<dyn LedgerStore>, cache_ttl: Duration) -> Self {
        Self {
            store,
            cache_ttl,
            cache: RwLock::new(CacheState::default()),
            write_lock: Mutex::new(()),
        }
    }

    /// Current records in registration order (cached for up to `cache_ttl`).
    pub fn players(&self) -> Result<Arc<Vec<PlayerRecord>>, LedgerError> {
        let generation = {
            let cache = self.cache.read().map_err(|_| lock_error())?;
            if let Some(snapshot) = cache.snapshot.as_ref() {
                if snapshot.loaded_at.elapsed() < self.cache_ttl {
                    return Ok(Arc::clone(&snapshot.records));
                }
            }
            cache.generation
        };
        let records = Arc::new(self.store.list()?);
        let mut cache = self.cache.write().map_err(|_| lock_error())?;
        if cache.generation == generation {
            cache.snapshot = Some(CachedSnapshot {
                records: Arc::clone(&records),
                loaded_at: Instant::now(),
            });
        }
        Ok(records)
    }

    /// Fresh read of one player, bypassing the cache.
    pub fn player(&self, id: PlayerId) -> Result<PlayerRecord, LedgerError> {
        self.store.get(id)
    }

    pub fn settlement(&self) -> Result<Settlement, LedgerError> {
        Ok(compute_settlement(&self.players()?))
    }

    pub fn progress(&self) -> Result<Progress, LedgerError> {
        Ok(compute_progress(&self.players()?))
    }

    pub fn register(&self, input: NewPlayer) -> Result<PlayerRecord, LedgerError> {
        let record = register_player(input)?;
        self.mutate(|store| {
            store.append(record.clone())?;
            log::info!(
                "Registered {} ({}, {}, buy-in {})",
                record.name,
                record.team,
                record.skill,
                record.initial_buyin
            );
            Ok(record)
        })
    }

    pub fn add_rebuy(&self, id: PlayerId, amount: i64) -> Result<PlayerRecord, LedgerError> {
        self.mutate(|store| {
            let mut record = store.get(id)?;
            add_rebuy(&mut record, amount)?;
            store.update_fields(id, &FieldUpdate::rebuys_of(&record))?;
            log::info!("Re-buy {} for {} (total {})", amount, record.name, record.rebuy_total);
            store.get(id)
        })
    }

    pub fn undo_rebuy(&self, id: PlayerId) -> Result<PlayerRecord, LedgerError> {
        self.mutate(|store| {
            let mut record = store.get(id)?;
            let undone = undo_last_rebuy(&mut record)?;
            store.update_fields(id, &FieldUpdate::rebuys_of(&record))?;
            log::info!("Undid re-buy {} for {} (total {})", undone, record.name, record.rebuy_total);
            store.get(id)
        })
    }

    pub fn set_final_stack(&self, id: PlayerId, stack: i64) -> Result<PlayerRecord, LedgerError> {
        self.mutate(|store| {
            let mut record = store.get(id)?;
            set_final_stack(&mut record, stack);
            store.update_fields(id, &[FieldUpdate::FinalStack(record.final_stack)])?;
            log::info!("Final stack {} for {}", stack, record.name);
            store.get(id)
        })
    }

    pub fn delete_player(&self, id: PlayerId) -> Result<(), LedgerError> {
        self.mutate(|store| {
            store.delete(id)?;
            log::info!("Deleted player {}", id);
            Ok(())
        })
    }

    /// Remove every player. Irreversible.
    pub fn reset_all(&self) -> Result<(), LedgerError> {
        self.mutate(|store| {
            store.reset_all()?;
            log::warn!("Ledger reset: all players removed");
            Ok(())
        })
    }

    /// Run one mutation under the write lock, then drop the cached snapshot
    /// whether or not the mutation succeeded.
    fn mutate<T>(
        &self,
        f: impl FnOnce(&dyn LedgerStore) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let _guard = self.write_lock.lock().map_err(|_| lock_error())?;
        let result = f(self.store.as_ref());
        self.invalidate()?;
        if let Err(e @ LedgerError::StoreUnavailable(_)) = &result {
            log::error!("Ledger mutation abandoned: {}", e);
        }
        result
    }

    /// Drop the cached snapshot.
    pub fn invalidate(&self) -> Result<(), LedgerError> {
        let mut cache = self.cache.write().map_err(|_| lock_error())?;
        cache.snapshot = None;
        cache.generation = cache.generation.wrapping_add(1);
        Ok(())
    }
}
