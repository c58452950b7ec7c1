//! Ledger business logic: registration, re-buys, settlement, progress.

mod progress;
mod rebuy;
mod registration;
mod settlement;

pub use progress::compute_progress;
pub use rebuy::{add_rebuy, set_final_stack, undo_last_rebuy};
pub use registration::register_player;
pub use settlement::{compute_settlement, handicap_profit};
