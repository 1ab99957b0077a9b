//! Game-server tournament backend: library with models and business logic.

pub mod logic;
pub mod models;

pub use logic::{
    cleanup_orphaned_match_results, create_or_update_match_result, delete_match_result,
    delete_result_for_map, infer_side_mapping, override_team_mapping, recalculate_all_rankings,
    MappingAmbiguity, SideMapping,
};
pub use models::{
    MapId, Match, MatchId, MatchMap, MatchResult, PlayerSession, ResultId, Round, RoundId, Team,
    TeamId, TeamRanking, Tournament, TournamentError, TournamentId,
};
