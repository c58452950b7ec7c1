//! Settlement output: individual and team standings.

use crate::models::player::{PlayerId, Skill, Team};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One settled player's figures, as placed in a ranking.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerStanding {
    /// 1-based position in the ranking this row belongs to.
    pub rank: usize,
    pub player_id: PlayerId,
    pub name: String,
    pub team: Team,
    pub skill: Skill,
    pub initial_buyin: u64,
    pub rebuy_total: u64,
    pub total_buyin: u64,
    pub final_stack: i64,
    pub profit: i64,
    pub handicap_profit: i64,
    pub created_at: DateTime<Utc>,
}

/// Summed figures for one team (settled members only).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub rank: usize,
    pub team: Team,
    /// Settled members counted in the sums.
    pub players: usize,
    pub profit: i64,
    pub handicap_profit: i64,
}

/// Everything derived from one ledger snapshot.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub individual_by_profit: Vec<PlayerStanding>,
    pub individual_by_handicap: Vec<PlayerStanding>,
    pub team_by_profit: Vec<TeamStanding>,
    pub team_by_handicap: Vec<TeamStanding>,
    /// Players still missing a final stack, in registration order.
    pub pending_names: Vec<String>,
}

impl Settlement {
    /// True when every registered player has a final stack.
    pub fn is_complete(&self) -> bool {
        self.pending_names.is_empty()
    }
}
