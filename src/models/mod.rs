//! Data structures: teams, matches, rounds, results, rankings, tournaments.

mod game_match;
mod match_result;
mod ranking;
mod round;
mod team;
mod tournament;

pub use game_match::{MapId, Match, MatchId, MatchMap};
pub use match_result::{MatchResult, ResultId};
pub use ranking::TeamRanking;
pub use round::{PlayerSession, Round, RoundId};
pub use team::{Team, TeamId};
pub use tournament::{Tournament, TournamentError, TournamentId};
