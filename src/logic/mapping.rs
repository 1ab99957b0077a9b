//! Side-mapping inference: which tournament team played which round side.
//!
//! Round data only knows sides 1 and 2 with opaque labels ("Axis"/"Allies").
//! The vote heuristic matches session player names against the two match
//! rosters and lets the majority decide. Ambiguity is reported, never
//! guessed away.

use crate::models::PlayerSession;

/// Which round side match-team-1 played. Team 2 always takes the other side.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SideMapping {
    Team1IsSide1,
    Team1IsSide2,
}

impl SideMapping {
    /// Reorder a (side1, side2) pair into (team1, team2) order.
    pub fn order<T>(self, side1: T, side2: T) -> (T, T) {
        match self {
            SideMapping::Team1IsSide1 => (side1, side2),
            SideMapping::Team1IsSide2 => (side2, side1),
        }
    }
}

/// Why side mapping could not be determined. Not a hard error: the caller
/// records a partial result and surfaces the message as a warning.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MappingAmbiguity {
    /// No session player matched either roster.
    NoRosteredPlayers,
    /// A roster's players split evenly between the two sides.
    TiedVote,
    /// Both rosters' players appear predominantly on the same side.
    Contradictory,
}

impl std::fmt::Display for MappingAmbiguity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MappingAmbiguity::NoRosteredPlayers => {
                write!(f, "could not determine team mapping - no matching players found")
            }
            MappingAmbiguity::TiedVote => {
                write!(f, "could not determine team mapping - player votes are tied")
            }
            MappingAmbiguity::Contradictory => write!(
                f,
                "could not determine team mapping - both teams' players appear on the same side"
            ),
        }
    }
}

/// Per-roster, per-side vote counts accumulated from sessions.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct Votes {
    side1: u32,
    side2: u32,
}

impl Votes {
    fn total(self) -> u32 {
        self.side1 + self.side2
    }

    /// The side this roster's players favour: 1, 2, or None on a tie.
    fn preferred_side(self) -> Option<u8> {
        match self.side1.cmp(&self.side2) {
            std::cmp::Ordering::Greater => Some(1),
            std::cmp::Ordering::Less => Some(2),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Infer which round side team 1 played from player-session membership.
///
/// Each session whose player name (trimmed, case-insensitive) appears on
/// exactly one roster casts one vote for (that roster, session side). A name
/// on both rosters is skipped. Per roster with votes, the strict majority
/// side is its preferred side; a single voting roster fixes the other by
/// elimination. Sessions with a side other than 1 or 2 are ignored.
pub fn infer_side_mapping(
    roster1: &[String],
    roster2: &[String],
    sessions: &[PlayerSession],
) -> Result<SideMapping, MappingAmbiguity> {
    let mut votes1 = Votes::default();
    let mut votes2 = Votes::default();

    for s in sessions {
        if s.team != 1 && s.team != 2 {
            continue;
        }
        let on1 = roster_has(roster1, &s.player_name);
        let on2 = roster_has(roster2, &s.player_name);
        let votes = match (on1, on2) {
            (true, false) => &mut votes1,
            (false, true) => &mut votes2,
            _ => continue,
        };
        if s.team == 1 {
            votes.side1 += 1;
        } else {
            votes.side2 += 1;
        }
    }

    if votes1.total() == 0 && votes2.total() == 0 {
        return Err(MappingAmbiguity::NoRosteredPlayers);
    }

    let pref1 = if votes1.total() > 0 {
        Some(votes1.preferred_side().ok_or(MappingAmbiguity::TiedVote)?)
    } else {
        None
    };
    let pref2 = if votes2.total() > 0 {
        Some(votes2.preferred_side().ok_or(MappingAmbiguity::TiedVote)?)
    } else {
        None
    };

    match (pref1, pref2) {
        (Some(s1), Some(s2)) if s1 == s2 => Err(MappingAmbiguity::Contradictory),
        (Some(1), _) | (None, Some(2)) => Ok(SideMapping::Team1IsSide1),
        (Some(_), _) | (None, Some(_)) => Ok(SideMapping::Team1IsSide2),
        // Unreachable: total votes > 0 means at least one roster voted.
        (None, None) => Err(MappingAmbiguity::NoRosteredPlayers),
    }
}

fn roster_has(roster: &[String], name: &str) -> bool {
    let name = name.trim();
    roster.iter().any(|p| p.trim().eq_ignore_ascii_case(name))
}
