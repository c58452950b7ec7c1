//! In-tournament progress summary (registrations and re-buys per team).

use crate::models::player::Team;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamProgress {
    pub team: Team,
    pub players: usize,
    pub rebuy_total: u64,
    pub rebuy_count: u64,
    /// Members with no final stack yet.
    pub pending: usize,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub players: usize,
    /// One entry per team, in team order, even when a team has no members.
    pub teams: Vec<TeamProgress>,
    pub rebuy_total: u64,
}
