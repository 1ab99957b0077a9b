//! Round and per-player session facts from live game servers.
//!
//! Rounds are produced by server polling and are read-only to the tournament
//! logic: side labels are opaque strings ("Axis"/"Allies"), side numbers are
//! 1 and 2, and tickets may be missing when a round never concluded.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a completed round.
pub type RoundId = Uuid;

/// One player's participation in a round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerSession {
    pub player_name: String,
    /// Round side the player was on: 1 or 2, matching the round's numbering.
    pub team: u8,
    pub score: i32,
    pub kills: u32,
    pub deaths: u32,
}

impl PlayerSession {
    pub fn new(player_name: impl Into<String>, team: u8) -> Self {
        Self {
            player_name: player_name.into(),
            team,
            score: 0,
            kills: 0,
            deaths: 0,
        }
    }
}

/// A completed play session on a game server with final scores.
/// Side labels are NOT tournament team identities.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    pub server: String,
    pub map_name: String,
    pub team1_label: String,
    pub team2_label: String,
    /// Final ticket count for side 1; None if the round never concluded.
    pub tickets1: Option<i32>,
    /// Final ticket count for side 2; None if the round never concluded.
    pub tickets2: Option<i32>,
    pub sessions: Vec<PlayerSession>,
}

impl Round {
    pub fn new(server: impl Into<String>, map_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            server: server.into(),
            map_name: map_name.into(),
            team1_label: String::new(),
            team2_label: String::new(),
            tickets1: None,
            tickets2: None,
            sessions: Vec::new(),
        }
    }
}
