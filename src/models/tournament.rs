//! Tournament aggregate and TournamentError.

use crate::models::game_match::{MapId, Match, MatchId};
use crate::models::match_result::{MatchResult, ResultId};
use crate::models::ranking::TeamRanking;
use crate::models::round::RoundId;
use crate::models::team::{Team, TeamId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Team id not found in this tournament.
    TeamNotFound(TeamId),
    /// Match id not found in this tournament.
    MatchNotFound(MatchId),
    /// Map id not found in the given match.
    MapNotFound(MapId),
    /// Match result id not found in this tournament.
    ResultNotFound(ResultId),
    /// Round id does not exist in the round store.
    RoundNotFound(RoundId),
    /// A team with this name already exists (names are unique, case-insensitive).
    DuplicateTeamName,
    /// The player is already rostered on a team in this tournament.
    PlayerAlreadyRostered(String),
    /// The two team ids must be distinct.
    SameTeamTwice,
    /// The team belongs to a different tournament (or none).
    TeamNotInTournament(TeamId),
    /// The team is not one of the match's two teams.
    TeamNotInMatch(TeamId),
    /// The team is still referenced by at least one match and cannot be deleted.
    TeamReferencedByMatch(TeamId),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::TeamNotFound(_) => write!(f, "Team not found"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::MapNotFound(_) => write!(f, "Match map not found"),
            TournamentError::ResultNotFound(_) => write!(f, "Match result not found"),
            TournamentError::RoundNotFound(id) => write!(f, "Round {} does not exist", id),
            TournamentError::DuplicateTeamName => {
                write!(f, "A team with this name already exists")
            }
            TournamentError::PlayerAlreadyRostered(name) => {
                write!(f, "Player '{}' is already on a team in this tournament", name)
            }
            TournamentError::SameTeamTwice => write!(f, "The two teams must be distinct"),
            TournamentError::TeamNotInTournament(id) => {
                write!(f, "Team {} does not belong to this tournament", id)
            }
            TournamentError::TeamNotInMatch(id) => {
                write!(f, "Team {} is not one of the match's teams", id)
            }
            TournamentError::TeamReferencedByMatch(_) => {
                write!(f, "Team is referenced by a match and cannot be deleted")
            }
        }
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Full tournament structure: teams, fixtures, reconciled results, standings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub teams: Vec<Team>,
    pub matches: Vec<Match>,
    /// Reconciled outcomes, at most one per map.
    pub match_results: Vec<MatchResult>,
    /// Derived standings; replaced wholesale by the ranking calculator.
    pub rankings: Vec<TeamRanking>,
}

impl Tournament {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            teams: Vec::new(),
            matches: Vec::new(),
            match_results: Vec::new(),
            rankings: Vec::new(),
        }
    }

    pub fn get_team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn get_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    pub fn get_result(&self, id: ResultId) -> Option<&MatchResult> {
        self.match_results.iter().find(|r| r.id == id)
    }

    pub fn get_result_mut(&mut self, id: ResultId) -> Option<&mut MatchResult> {
        self.match_results.iter_mut().find(|r| r.id == id)
    }

    /// The result for a given map, if one has been reconciled.
    pub fn result_for_map(&self, map_id: MapId) -> Option<&MatchResult> {
        self.match_results.iter().find(|r| r.map_id == map_id)
    }

    /// Register a team. Names are unique (case-insensitive); roster names
    /// must not already appear on another team in this tournament.
    pub fn add_team(
        &mut self,
        name: impl Into<String>,
        players: Vec<String>,
    ) -> Result<TeamId, TournamentError> {
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(TournamentError::DuplicateTeamName);
        }
        if self
            .teams
            .iter()
            .any(|t| t.name.eq_ignore_ascii_case(name_trimmed))
        {
            return Err(TournamentError::DuplicateTeamName);
        }
        for p in &players {
            if self.teams.iter().any(|t| t.has_player(p)) {
                return Err(TournamentError::PlayerAlreadyRostered(p.clone()));
            }
        }
        let team = Team::new(name_trimmed, players);
        let id = team.id;
        self.teams.push(team);
        Ok(id)
    }

    /// Add one player name to a team's roster.
    pub fn add_team_player(
        &mut self,
        team_id: TeamId,
        player: impl Into<String>,
    ) -> Result<(), TournamentError> {
        let player = player.into();
        if self.teams.iter().any(|t| t.has_player(&player)) {
            return Err(TournamentError::PlayerAlreadyRostered(player));
        }
        let team = self
            .teams
            .iter_mut()
            .find(|t| t.id == team_id)
            .ok_or(TournamentError::TeamNotFound(team_id))?;
        team.players.push(player.trim().to_string());
        Ok(())
    }

    /// Delete a team. Only allowed when no match references it.
    pub fn remove_team(&mut self, team_id: TeamId) -> Result<(), TournamentError> {
        let idx = self
            .teams
            .iter()
            .position(|t| t.id == team_id)
            .ok_or(TournamentError::TeamNotFound(team_id))?;
        if self.matches.iter().any(|m| m.involves(team_id)) {
            return Err(TournamentError::TeamReferencedByMatch(team_id));
        }
        self.teams.remove(idx);
        Ok(())
    }

    /// Schedule a match between two distinct registered teams.
    pub fn add_match(
        &mut self,
        team1_id: TeamId,
        team2_id: TeamId,
        scheduled: chrono::DateTime<chrono::Utc>,
    ) -> Result<MatchId, TournamentError> {
        if team1_id == team2_id {
            return Err(TournamentError::SameTeamTwice);
        }
        for id in [team1_id, team2_id] {
            if self.get_team(id).is_none() {
                return Err(TournamentError::TeamNotFound(id));
            }
        }
        let m = Match::new(team1_id, team2_id, scheduled);
        let id = m.id;
        self.matches.push(m);
        Ok(id)
    }

    /// Delete a map from a match, along with its result (if any).
    /// Remaining maps keep their relative order and are re-indexed.
    pub fn remove_map(&mut self, match_id: MatchId, map_id: MapId) -> Result<(), TournamentError> {
        let m = self
            .get_match_mut(match_id)
            .ok_or(TournamentError::MatchNotFound(match_id))?;
        let idx = m
            .maps
            .iter()
            .position(|mp| mp.id == map_id)
            .ok_or(TournamentError::MapNotFound(map_id))?;
        m.maps.remove(idx);
        for (i, mp) in m.maps.iter_mut().enumerate() {
            mp.order = i as u32;
        }
        self.match_results.retain(|r| r.map_id != map_id);
        Ok(())
    }
}
