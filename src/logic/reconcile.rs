//! Match result reconciliation: turn a played round into a team-attributed
//! MatchResult, or record a partial result with a warning when the side
//! mapping is ambiguous.

use crate::logic::mapping::{infer_side_mapping, SideMapping};
use crate::models::{
    MapId, MatchId, MatchResult, ResultId, Round, TeamId, Tournament, TournamentError,
};

/// Create or update the MatchResult for one map from a played round.
///
/// Side mapping priority: an explicit `MatchMap.team_id` pre-assignment
/// anchors that team to round side 1; otherwise the mapping is inferred from
/// player-session roster membership. On ambiguity a result is still written
/// (null team ids, raw tickets preserved) and the warning is returned so an
/// admin can resolve it via [`override_team_mapping`].
///
/// Upserts keyed by map id: an existing result keeps its id. The match's
/// current week is copied onto the result on every call.
pub fn create_or_update_match_result(
    tournament: &mut Tournament,
    round: &Round,
    match_id: MatchId,
    map_id: MapId,
) -> Result<(ResultId, Option<String>), TournamentError> {
    let m = tournament
        .get_match(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    let map = m.get_map(map_id).ok_or(TournamentError::MapNotFound(map_id))?;

    let team1_id = m.team1_id;
    let team2_id = m.team2_id;
    let week = m.week.clone();
    let tournament_id = tournament.id;

    let (mapping, warning) = match map.team_id {
        // Pre-assignment: the stored team is round side 1, the other team
        // follows by elimination.
        Some(anchor) if anchor == team1_id => (Some(SideMapping::Team1IsSide1), None),
        Some(anchor) if anchor == team2_id => (Some(SideMapping::Team1IsSide2), None),
        Some(anchor) => return Err(TournamentError::TeamNotInMatch(anchor)),
        None => {
            let roster1 = tournament
                .get_team(team1_id)
                .ok_or(TournamentError::TeamNotFound(team1_id))?
                .players
                .clone();
            let roster2 = tournament
                .get_team(team2_id)
                .ok_or(TournamentError::TeamNotFound(team2_id))?
                .players
                .clone();
            match infer_side_mapping(&roster1, &roster2, &round.sessions) {
                Ok(mapping) => (Some(mapping), None),
                Err(ambiguity) => (None, Some(ambiguity.to_string())),
            }
        }
    };

    let mut result = match tournament.match_results.iter().find(|r| r.map_id == map_id) {
        Some(existing) => existing.clone(),
        None => MatchResult::new(tournament_id, match_id, map_id, round.id),
    };
    result.round_id = round.id;
    result.week = week;

    match mapping {
        Some(mapping) => {
            // Result slots follow the match's team order; tickets are
            // reordered from round sides to match that order.
            let (t1_tickets, t2_tickets) = mapping.order(round.tickets1, round.tickets2);
            result.team1_id = Some(team1_id);
            result.team2_id = Some(team2_id);
            result.team1_tickets = t1_tickets;
            result.team2_tickets = t2_tickets;
            result.winning_team_id = result.winner_from_tickets();
        }
        None => {
            // Mapping failed: keep the raw side ordering so ticket totals
            // survive until a manual override completes the record.
            result.team1_id = None;
            result.team2_id = None;
            result.winning_team_id = None;
            result.team1_tickets = round.tickets1;
            result.team2_tickets = round.tickets2;
        }
    }

    let result_id = result.id;
    match tournament.match_results.iter_mut().find(|r| r.map_id == map_id) {
        Some(slot) => *slot = result,
        None => tournament.match_results.push(result),
    }
    Ok((result_id, warning))
}

/// Manual correction of a result's team attribution. Both ids must be
/// distinct teams of this tournament. The winner is recomputed from the
/// tickets already stored on the result; tickets are never re-read from the
/// round here.
pub fn override_team_mapping(
    tournament: &mut Tournament,
    result_id: ResultId,
    team1_id: TeamId,
    team2_id: TeamId,
) -> Result<(), TournamentError> {
    if team1_id == team2_id {
        return Err(TournamentError::SameTeamTwice);
    }
    for id in [team1_id, team2_id] {
        if tournament.get_team(id).is_none() {
            return Err(TournamentError::TeamNotInTournament(id));
        }
    }
    let result = tournament
        .get_result_mut(result_id)
        .ok_or(TournamentError::ResultNotFound(result_id))?;
    result.team1_id = Some(team1_id);
    result.team2_id = Some(team2_id);
    result.winning_team_id = result.winner_from_tickets();
    Ok(())
}

/// Hard delete. The caller is responsible for recalculating rankings.
pub fn delete_match_result(
    tournament: &mut Tournament,
    result_id: ResultId,
) -> Result<(), TournamentError> {
    let idx = tournament
        .match_results
        .iter()
        .position(|r| r.id == result_id)
        .ok_or(TournamentError::ResultNotFound(result_id))?;
    tournament.match_results.remove(idx);
    Ok(())
}

/// Remove the result linked to a map, if any. Used when a round is unlinked.
/// Returns whether a result was removed.
pub fn delete_result_for_map(tournament: &mut Tournament, map_id: MapId) -> bool {
    let before = tournament.match_results.len();
    tournament.match_results.retain(|r| r.map_id != map_id);
    tournament.match_results.len() != before
}
