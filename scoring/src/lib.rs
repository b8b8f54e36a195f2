//! Live scoring for a doubles tennis match.
//!
//! [`MatchState`] owns the mutable match state (points, games, sets, serve
//! rotation, tiebreak mode) and consumes high-level commands: each resolved
//! point advances the score, appends one immutable event to the log and
//! updates the per-seat statistics table incrementally. The history stack
//! gives exact multi-level undo, and [`tabular`] reads and writes the event
//! log as a flat CSV independently of the live machine.

pub mod commands;
pub mod history;
pub mod score;
pub mod state;
pub mod tabular;

pub use commands::{MatchCommand, MatchError, PlayerSpec};
pub use state::{MatchState, Phase, Team};
