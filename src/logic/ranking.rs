//! Team ranking calculation: rebuild all standings rows for a tournament
//! from its current match results, per week and cumulative.

use crate::models::{TeamId, TeamRanking, Tournament};
use std::collections::BTreeMap;

/// Running totals for one team within one week group.
#[derive(Clone, Copy, Debug, Default)]
struct Tally {
    won: u32,
    tied: u32,
    lost: u32,
    ticket_differential: i64,
}

/// Recompute every TeamRanking row for the tournament and replace the
/// existing set wholesale. Returns the number of rows written.
///
/// Only results with both team ids mapped count. Groups: one per distinct
/// week value plus a cumulative group keyed None. Within a group teams are
/// ordered by rounds won (desc), then ticket differential (desc), then team
/// id (asc) so ranks are dense, 1-based and reproducible from the same data.
pub fn recalculate_all_rankings(tournament: &mut Tournament) -> usize {
    // group key -> team -> tally; BTreeMap keeps group/team iteration stable.
    let mut groups: BTreeMap<Option<String>, BTreeMap<TeamId, Tally>> = BTreeMap::new();

    for r in &tournament.match_results {
        let (team1, team2) = match (r.team1_id, r.team2_id) {
            (Some(t1), Some(t2)) => (t1, t2),
            // Unmapped results contribute nothing to standings.
            _ => continue,
        };
        let t1_tickets = i64::from(r.team1_tickets.unwrap_or(0));
        let t2_tickets = i64::from(r.team2_tickets.unwrap_or(0));

        let mut keys = vec![None];
        if let Some(week) = &r.week {
            keys.push(Some(week.clone()));
        }
        for key in keys {
            let group = groups.entry(key).or_default();
            let tally1 = group.entry(team1).or_default();
            tally1.ticket_differential += t1_tickets - t2_tickets;
            match r.winning_team_id {
                Some(w) if w == team1 => tally1.won += 1,
                Some(_) => tally1.lost += 1,
                None => tally1.tied += 1,
            }
            let tally2 = group.entry(team2).or_default();
            tally2.ticket_differential += t2_tickets - t1_tickets;
            match r.winning_team_id {
                Some(w) if w == team2 => tally2.won += 1,
                Some(_) => tally2.lost += 1,
                None => tally2.tied += 1,
            }
        }
    }

    let tournament_id = tournament.id;
    let mut rankings = Vec::new();
    for (week, tallies) in groups {
        let mut rows: Vec<(TeamId, Tally)> = tallies.into_iter().collect();
        rows.sort_by(|(a_id, a), (b_id, b)| {
            b.won
                .cmp(&a.won)
                .then(b.ticket_differential.cmp(&a.ticket_differential))
                .then(a_id.cmp(b_id))
        });
        for (i, (team_id, tally)) in rows.into_iter().enumerate() {
            rankings.push(TeamRanking {
                tournament_id,
                team_id,
                week: week.clone(),
                rank: i as u32 + 1,
                rounds_won: tally.won,
                rounds_tied: tally.tied,
                rounds_lost: tally.lost,
                ticket_differential: tally.ticket_differential,
            });
        }
    }

    let total = rankings.len();
    tournament.rankings = rankings;
    total
}

/// Delete results whose map (or match) no longer exists. Historical bugs
/// could bypass the normal delete path and strand results. Returns the
/// number removed; the caller should recalculate rankings afterwards.
pub fn cleanup_orphaned_match_results(tournament: &mut Tournament) -> usize {
    let live_maps: std::collections::HashSet<_> = tournament
        .matches
        .iter()
        .flat_map(|m| m.maps.iter().map(|mp| mp.id))
        .collect();
    let before = tournament.match_results.len();
    tournament.match_results.retain(|r| live_maps.contains(&r.map_id));
    before - tournament.match_results.len()
}
