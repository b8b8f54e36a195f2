//! Command surface and errors for the score state machine.

use court::{RallyOutcome, SeatId, ServeEnding};
use serde::{Deserialize, Serialize};

use crate::state::{MatchState, Phase};

/// Errors surfaced to the caller. None of these leave the match state
/// modified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("match has not been started")]
    NotStarted,
    #[error("match is already over")]
    MatchOver,
    #[error("{command} is not valid while {phase}")]
    WrongPhase {
        command: &'static str,
        phase: Phase,
    },
    #[error("lineup needs four distinct, non-empty player names")]
    InvalidLineup,
    #[error("second server must come from the receiving team")]
    InvalidServerSelection,
    #[error("cannot undo while a point is pending attribution")]
    UndoDuringAttribution,
}

/// Roster entry for one player at match start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSpec {
    /// Stable profile identifier; may be empty for unregistered players.
    pub profile_id: String,
    pub name: String,
}

impl PlayerSpec {
    pub fn new(profile_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
            name: name.into(),
        }
    }
}

/// The full command surface consumed from the UI collaborator.
///
/// Every variant maps onto one [`MatchState`] method; [`MatchState::apply`]
/// dispatches. Commands issued in the wrong phase are rejected with a
/// [`MatchError`] and never corrupt state.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchCommand {
    StartMatch {
        team_a: [PlayerSpec; 2],
        team_b: [PlayerSpec; 2],
    },
    SelectFirstServer {
        seat: SeatId,
    },
    ConfirmSecondServer {
        seat: SeatId,
    },
    FirstServeFault,
    QuickAttributePoint {
        reason: ServeEnding,
        timestamp: Option<f64>,
    },
    AwardRallyStart {
        reason: RallyOutcome,
        timestamp: Option<f64>,
    },
    AttributeRally {
        ending_player: SeatId,
        at_net: bool,
        is_return: bool,
    },
    CancelPoint,
    UndoLastPoint,
    ResetState,
    ResumeMatch {
        state: Box<MatchState>,
    },
}
