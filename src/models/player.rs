//! PlayerRecord, Team, and Skill.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (ledger row key).
pub type PlayerId = Uuid;

/// Which side of the team competition a player plays for.
///
/// Variant order is the team identifier order used for tie-breaks.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Team {
    #[serde(rename = "CSE")]
    Cse,
    #[serde(rename = "RC")]
    Rc,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Cse, Team::Rc];

    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Cse => "CSE",
            Team::Rc => "RC",
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Team {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "CSE" => Ok(Team::Cse),
            "RC" => Ok(Team::Rc),
            other => Err(format!("unknown team {other:?}")),
        }
    }
}

/// Skill bracket; decides the handicap multiplier.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    #[serde(alias = "初心者")]
    Novice,
    #[serde(alias = "経験者")]
    Expert,
}

impl Skill {
    pub fn as_str(&self) -> &'static str {
        match self {
            Skill::Novice => "novice",
            Skill::Expert => "expert",
        }
    }
}

impl std::fmt::Display for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Skill {
    type Err = String;

    /// Accepts the labels written by older sheets as well.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "novice" | "初心者" => Ok(Skill::Novice),
            "expert" | "経験者" => Ok(Skill::Expert),
            other => Err(format!("unknown skill {other:?}")),
        }
    }
}

/// Registration input (everything fixed at creation).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    pub team: Team,
    pub skill: Skill,
    #[serde(default)]
    pub initial_buyin: u64,
}

/// One ledger row: a participant and their chip movements.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player_id: PlayerId,
    pub name: String,
    pub team: Team,
    pub skill: Skill,
    pub initial_buyin: u64,
    /// Always `rebuy_history.iter().sum()`.
    pub rebuy_total: u64,
    /// Always `rebuy_history.len()`.
    pub rebuy_count: u32,
    /// Active re-buy amounts, oldest first.
    pub rebuy_history: Vec<u64>,
    /// None until the player has cashed out.
    pub final_stack: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlayerRecord {
    /// Fresh record with no re-buys and no final stack, stamped `now`.
    pub fn new(
        name: impl Into<String>,
        team: Team,
        skill: Skill,
        initial_buyin: u64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            player_id: Uuid::new_v4(),
            name: name.into(),
            team,
            skill,
            initial_buyin,
            rebuy_total: 0,
            rebuy_count: 0,
            rebuy_history: Vec::new(),
            final_stack: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Initial buy-in plus all active re-buys.
    pub fn total_buyin(&self) -> u64 {
        self.initial_buyin.saturating_add(self.rebuy_total)
    }

    /// `final_stack - total_buyin`, or None while the final stack is missing.
    pub fn profit(&self) -> Option<i64> {
        let total = i64::try_from(self.total_buyin()).unwrap_or(i64::MAX);
        self.final_stack.map(|stack| stack.saturating_sub(total))
    }

    pub fn is_settled(&self) -> bool {
        self.final_stack.is_some()
    }
}
