//! Data structures for the poker ledger: players, settlement and progress views, errors.

mod error;
mod player;
mod progress;
mod settlement;

pub use error::LedgerError;
pub use player::{NewPlayer, PlayerId, PlayerRecord, Skill, Team};
pub use progress::{Progress, TeamProgress};
pub use settlement::{PlayerStanding, Settlement, TeamStanding};
