//! Match (fixture between two teams) and MatchMap (one map within a match).

use crate::models::round::RoundId;
use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Unique identifier for a match map.
pub type MapId = Uuid;

/// One map within a match. Order determines the map sequence; at most one
/// round can be linked, and at most one result exists per map.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchMap {
    pub id: MapId,
    pub map_name: String,
    /// Zero-based position within the match's map list.
    pub order: u32,
    /// The concrete played round this map corresponds to, once known.
    pub round_id: Option<RoundId>,
    /// Manual pre-assignment: this tournament team played round side 1.
    pub team_id: Option<TeamId>,
}

impl MatchMap {
    pub fn new(map_name: impl Into<String>, order: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            map_name: map_name.into(),
            order,
            round_id: None,
            team_id: None,
        }
    }
}

/// A tournament fixture between two registered teams, spanning one or more maps.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub team1_id: TeamId,
    pub team2_id: TeamId,
    pub scheduled: DateTime<Utc>,
    /// Optional game-server reference (address or label).
    pub server: Option<String>,
    /// Free-form grouping label, e.g. "Week 1". None = unscheduled week.
    pub week: Option<String>,
    /// Ordered map list.
    pub maps: Vec<MatchMap>,
}

impl Match {
    pub fn new(team1_id: TeamId, team2_id: TeamId, scheduled: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            team1_id,
            team2_id,
            scheduled,
            server: None,
            week: None,
            maps: Vec::new(),
        }
    }

    /// Whether the given team is one of this match's two teams.
    pub fn involves(&self, team_id: TeamId) -> bool {
        self.team1_id == team_id || self.team2_id == team_id
    }

    /// The match's other team, given one of its two teams.
    pub fn other_team(&self, team_id: TeamId) -> Option<TeamId> {
        if team_id == self.team1_id {
            Some(self.team2_id)
        } else if team_id == self.team2_id {
            Some(self.team1_id)
        } else {
            None
        }
    }

    /// Append a map at the end of the sequence, returning its id.
    pub fn add_map(&mut self, map_name: impl Into<String>) -> MapId {
        let order = self.maps.len() as u32;
        let map = MatchMap::new(map_name, order);
        let id = map.id;
        self.maps.push(map);
        id
    }

    pub fn get_map(&self, map_id: MapId) -> Option<&MatchMap> {
        self.maps.iter().find(|m| m.id == map_id)
    }

    pub fn get_map_mut(&mut self, map_id: MapId) -> Option<&mut MatchMap> {
        self.maps.iter_mut().find(|m| m.id == map_id)
    }
}
