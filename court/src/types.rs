//! Canonical seat, team and player types for the project.

use serde::{Deserialize, Serialize};

/// One of the two sides of a doubles match.
///
/// Serialized and displayed as team 1 / team 2 to match the tabular export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamId {
    A,
    B,
}

impl TeamId {
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// 1-based team number as used in exports ("Team 1" / "Team 2").
    pub fn number(self) -> u8 {
        match self {
            Self::A => 1,
            Self::B => 2,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::A),
            2 => Some(Self::B),
            _ => None,
        }
    }

    /// Index into per-team arrays.
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Team {}", self.number())
    }
}

/// Fixed in-match seat identifier (0..=3).
///
/// Seats 0 and 1 belong to team A, seats 2 and 3 to team B. Assigned at
/// match start and immutable for the match duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatId(u8);

impl SeatId {
    pub const COUNT: usize = 4;

    /// All four seats in order.
    pub const SEATS: [SeatId; 4] = [SeatId(0), SeatId(1), SeatId(2), SeatId(3)];

    pub fn new(raw: u8) -> Option<Self> {
        (raw < 4).then_some(Self(raw))
    }

    pub fn raw(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn team(self) -> TeamId {
        if self.0 < 2 {
            TeamId::A
        } else {
            TeamId::B
        }
    }

    /// The other seat on the same team.
    pub fn partner(self) -> SeatId {
        match self.0 {
            0 => Self(1),
            1 => Self(0),
            2 => Self(3),
            _ => Self(2),
        }
    }

    pub fn all() -> impl Iterator<Item = SeatId> {
        Self::SEATS.into_iter()
    }
}

impl std::fmt::Display for SeatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A player occupying one seat for the duration of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub seat: SeatId,
    /// Stable identifier into the profile store; empty for placeholder
    /// players produced by heuristic reconstruction.
    pub profile_id: String,
    pub name: String,
}

/// How a rally ended, from the perspective of the player it is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RallyOutcome {
    Winner,
    ForcedError,
    UnforcedError,
}

impl RallyOutcome {
    /// Label used in descriptions and the tabular export.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Winner => "Winner",
            Self::ForcedError => "Forced Error",
            Self::UnforcedError => "Unforced Error",
        }
    }

    pub fn from_str_label(s: &str) -> Option<Self> {
        match s {
            "Winner" => Some(Self::Winner),
            "Forced Error" => Some(Self::ForcedError),
            "Unforced Error" => Some(Self::UnforcedError),
            _ => None,
        }
    }
}

impl std::fmt::Display for RallyOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point that ended on the serve alone, before any rally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServeEnding {
    Ace,
    DoubleFault,
}

impl ServeEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ace => "Ace",
            Self::DoubleFault => "Double Fault",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_team_assignment() {
        let seats: Vec<_> = SeatId::all().collect();
        assert_eq!(seats.len(), 4);
        assert_eq!(seats[0].team(), TeamId::A);
        assert_eq!(seats[1].team(), TeamId::A);
        assert_eq!(seats[2].team(), TeamId::B);
        assert_eq!(seats[3].team(), TeamId::B);
    }

    #[test]
    fn seat_partners_are_symmetric() {
        for seat in SeatId::all() {
            assert_eq!(seat.partner().partner(), seat);
            assert_eq!(seat.partner().team(), seat.team());
            assert_ne!(seat.partner(), seat);
        }
    }

    #[test]
    fn seat_bounds() {
        assert!(SeatId::new(3).is_some());
        assert!(SeatId::new(4).is_none());
    }

    #[test]
    fn team_numbers_round_trip() {
        assert_eq!(TeamId::from_number(1), Some(TeamId::A));
        assert_eq!(TeamId::from_number(2), Some(TeamId::B));
        assert_eq!(TeamId::from_number(3), None);
        assert_eq!(TeamId::A.other(), TeamId::B);
        assert_eq!(TeamId::A.to_string(), "Team 1");
    }

    #[test]
    fn rally_outcome_labels_round_trip() {
        for outcome in [
            RallyOutcome::Winner,
            RallyOutcome::ForcedError,
            RallyOutcome::UnforcedError,
        ] {
            assert_eq!(RallyOutcome::from_str_label(outcome.as_str()), Some(outcome));
        }
    }
}
