//! Team and roster data structures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament team.
pub type TeamId = Uuid;

/// A registered tournament team with its player roster.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    /// Unique within the tournament (case-insensitive).
    pub name: String,
    /// In-game player names. A name belongs to at most one team per tournament.
    pub players: Vec<String>,
}

impl Team {
    pub fn new(name: impl Into<String>, players: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            players,
        }
    }

    /// Whether the given in-game name is on this roster (trimmed, case-insensitive).
    pub fn has_player(&self, name: &str) -> bool {
        let name = name.trim();
        self.players.iter().any(|p| p.trim().eq_ignore_ascii_case(name))
    }
}
