//! Poker tournament ledger: models, settlement logic, storage, and the web API.

pub mod config;
pub mod ledger;
pub mod logic;
pub mod models;
pub mod store;
pub mod web;

pub use config::Settings;
pub use ledger::Ledger;
pub use logic::{
    add_rebuy, compute_progress, compute_settlement, handicap_profit, register_player,
    set_final_stack, undo_last_rebuy,
};
pub use models::{
    LedgerError, NewPlayer, PlayerId, PlayerRecord, PlayerStanding, Progress, Settlement, Skill,
    Team, TeamProgress, TeamStanding,
};
pub use store::{CsvLedgerStore, FieldUpdate, LedgerStore, MemoryLedgerStore};
