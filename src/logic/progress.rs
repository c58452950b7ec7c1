//! Progress summary shown while the tournament is running.

use crate::models::{PlayerRecord, Progress, Team, TeamProgress};

/// Head counts and re-buy totals per team, plus the overall re-buy total.
pub fn compute_progress(records: &[PlayerRecord]) -> Progress {
    let teams: Vec<TeamProgress> = Team::ALL
        .iter()
        .map(|&team| {
            let members = records.iter().filter(|r| r.team == team);
            members.fold(
                TeamProgress {
                    team,
                    players: 0,
                    rebuy_total: 0,
                    rebuy_count: 0,
                    pending: 0,
                },
                |mut acc, r| {
                    acc.players += 1;
                    acc.rebuy_total = acc.rebuy_total.saturating_add(r.rebuy_total);
                    acc.rebuy_count += u64::from(r.rebuy_count);
                    if !r.is_settled() {
                        acc.pending += 1;
                    }
                    acc
                },
            )
        })
        .collect();

    let rebuy_total = teams
        .iter()
        .fold(0u64, |sum, t| sum.saturating_add(t.rebuy_total));

    Progress {
        players: records.len(),
        teams,
        rebuy_total,
    }
}
