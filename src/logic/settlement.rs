//! Settlement: profit, handicap profit, and the four rankings.
//!
//! Everything here is a pure function of the snapshot it is given: no I/O,
//! no clock, no shared state. Running it twice on the same input yields the
//! same `Settlement`.

use crate::models::{PlayerRecord, PlayerStanding, Settlement, Skill, Team, TeamStanding};
use std::collections::BTreeMap;

/// Handicap-adjusted profit.
///
/// | profit | novice | expert |
/// |--------|--------|--------|
/// | >= 0   | x2     | x0.5   |
/// | < 0    | x0.5   | x2     |
///
/// Halves are rounded half away from zero (3 -> 2, -3 -> -2), computed on
/// integers so no float rounding ever enters the result.
pub fn handicap_profit(profit: i64, skill: Skill) -> i64 {
    match (profit >= 0, skill) {
        (true, Skill::Novice) | (false, Skill::Expert) => profit.saturating_mul(2),
        (true, Skill::Expert) | (false, Skill::Novice) => halve_away_from_zero(profit),
    }
}

fn halve_away_from_zero(value: i64) -> i64 {
    // unsigned_abs keeps i64::MIN in range; (2^63 + 1) / 2 fits in i64.
    let half = ((value.unsigned_abs() + 1) / 2) as i64;
    if value < 0 {
        -half
    } else {
        half
    }
}

/// Compute rankings over a snapshot given in registration order.
///
/// 1. Split into settled (final stack present) and pending; pending names are reported.
/// 2. profit = final_stack - (initial_buyin + rebuy_total); handicap via [`handicap_profit`].
/// 3. Individual rankings: metric descending, then earlier `created_at` first.
/// 4. Team rankings: summed metric descending, then team order.
pub fn compute_settlement(records: &[PlayerRecord]) -> Settlement {
    let mut settled: Vec<PlayerStanding> = Vec::new();
    let mut pending_names: Vec<String> = Vec::new();

    for record in records {
        match (record.final_stack, record.profit()) {
            (Some(final_stack), Some(profit)) => settled.push(PlayerStanding {
                rank: 0,
                player_id: record.player_id,
                name: record.name.clone(),
                team: record.team,
                skill: record.skill,
                initial_buyin: record.initial_buyin,
                rebuy_total: record.rebuy_total,
                total_buyin: record.total_buyin(),
                final_stack,
                profit,
                handicap_profit: handicap_profit(profit, record.skill),
                created_at: record.created_at,
            }),
            _ => pending_names.push(record.name.clone()),
        }
    }

    let individual_by_profit = rank_players(settled.clone(), |s| s.profit);
    let individual_by_handicap = rank_players(settled.clone(), |s| s.handicap_profit);

    let team_totals = team_totals(&settled);
    let team_by_profit = rank_teams(&team_totals, |t| t.profit);
    let team_by_handicap = rank_teams(&team_totals, |t| t.handicap_profit);

    Settlement {
        individual_by_profit,
        individual_by_handicap,
        team_by_profit,
        team_by_handicap,
        pending_names,
    }
}

fn rank_players(
    mut standings: Vec<PlayerStanding>,
    metric: impl Fn(&PlayerStanding) -> i64,
) -> Vec<PlayerStanding> {
    // sort_by is stable: full ties keep registration order.
    standings.sort_by(|a, b| {
        metric(b)
            .cmp(&metric(a))
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
    for (i, s) in standings.iter_mut().enumerate() {
        s.rank = i + 1;
    }
    standings
}

fn team_totals(settled: &[PlayerStanding]) -> Vec<TeamStanding> {
    let mut by_team: BTreeMap<Team, TeamStanding> = BTreeMap::new();
    for s in settled {
        let entry = by_team.entry(s.team).or_insert(TeamStanding {
            rank: 0,
            team: s.team,
            players: 0,
            profit: 0,
            handicap_profit: 0,
        });
        entry.players += 1;
        entry.profit = entry.profit.saturating_add(s.profit);
        entry.handicap_profit = entry.handicap_profit.saturating_add(s.handicap_profit);
    }
    by_team.into_values().collect()
}

fn rank_teams(totals: &[TeamStanding], metric: impl Fn(&TeamStanding) -> i64) -> Vec<TeamStanding> {
    let mut ranked = totals.to_vec();
    ranked.sort_by(|a, b| metric(b).cmp(&metric(a)).then_with(|| a.team.cmp(&b.team)));
    for (i, t) in ranked.iter_mut().enumerate() {
        t.rank = i + 1;
    }
    ranked
}
