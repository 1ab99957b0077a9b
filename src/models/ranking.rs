//! TeamRanking: derived standings rows, replaced wholesale on recalculation.

use crate::models::team::TeamId;
use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};

/// One standings row for one team in one week scope (None = cumulative).
/// Never mutated in place: the ranking calculator deletes and rewrites all
/// rows for a tournament on every recalculation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamRanking {
    pub tournament_id: TournamentId,
    pub team_id: TeamId,
    /// None = cumulative/all-time view.
    pub week: Option<String>,
    /// 1-based, dense, deterministic within the (tournament, week) group.
    pub rank: u32,
    pub rounds_won: u32,
    pub rounds_tied: u32,
    pub rounds_lost: u32,
    /// Sum of (own tickets - opponent tickets) over every counted result.
    pub ticket_differential: i64,
}
