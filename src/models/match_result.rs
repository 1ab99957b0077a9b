//! MatchResult: the reconciled, team-attributed outcome of one match map.

use crate::models::game_match::{MapId, MatchId};
use crate::models::round::RoundId;
use crate::models::team::TeamId;
use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match result.
pub type ResultId = Uuid;

/// Outcome of one MatchMap, with round sides mapped onto tournament teams.
/// At most one result exists per map. Team ids are None when side mapping
/// failed (tickets are still captured so no data is lost).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub id: ResultId,
    pub tournament_id: TournamentId,
    pub match_id: MatchId,
    pub map_id: MapId,
    pub round_id: RoundId,
    /// Copied from the match's week at reconcile time, for ranking grouping.
    pub week: Option<String>,
    /// First attributed team; tickets below are stored in the same order.
    pub team1_id: Option<TeamId>,
    /// Second attributed team.
    pub team2_id: Option<TeamId>,
    /// None when tied or unmapped.
    pub winning_team_id: Option<TeamId>,
    pub team1_tickets: Option<i32>,
    pub team2_tickets: Option<i32>,
}

impl MatchResult {
    pub fn new(
        tournament_id: TournamentId,
        match_id: MatchId,
        map_id: MapId,
        round_id: RoundId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            match_id,
            map_id,
            round_id,
            week: None,
            team1_id: None,
            team2_id: None,
            winning_team_id: None,
            team1_tickets: None,
            team2_tickets: None,
        }
    }

    /// Winner from the stored tickets: strictly greater wins, equal or
    /// missing tickets mean no winner. Requires both team ids to be set.
    pub fn winner_from_tickets(&self) -> Option<TeamId> {
        match (self.team1_tickets, self.team2_tickets) {
            (Some(t1), Some(t2)) if t1 > t2 => self.team1_id,
            (Some(t1), Some(t2)) if t2 > t1 => self.team2_id,
            _ => None,
        }
    }
}
