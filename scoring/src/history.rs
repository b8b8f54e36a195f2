//! Snapshot stack backing multi-level undo.
//!
//! A snapshot copies only the mutable scoring fields and remembers the log
//! length instead of cloning the event log, so a long match never pays
//! quadratic memory for its undo history. Snapshots hold no history of
//! their own; the remaining stack below a popped entry is the undo tail.

use court::{SeatId, TeamId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use stats::StatsTable;

use crate::state::{MatchState, Phase, Team};

/// State captured before one score-mutating command.
///
/// Transient per-point fields (pending rally reason, first-serve fault,
/// pending timestamp) are deliberately not captured: restoring always lands
/// back in [`Phase::Scoring`] with a clean point, so undoing every resolved
/// point returns the machine to its exact post-setup state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    teams: [Team; 2],
    current_set: usize,
    server: SeatId,
    serve_order: SmallVec<[SeatId; 4]>,
    serve_cursor: usize,
    tiebreak: bool,
    over: bool,
    winner: Option<TeamId>,
    stats: StatsTable,
    log_len: usize,
}

impl Snapshot {
    pub(crate) fn capture(state: &MatchState) -> Self {
        Self {
            teams: state.teams.clone(),
            current_set: state.current_set,
            server: state.server,
            serve_order: state.serve_order.clone(),
            serve_cursor: state.serve_cursor,
            tiebreak: state.tiebreak,
            over: state.over,
            winner: state.winner,
            stats: state.stats.clone(),
            log_len: state.log.len(),
        }
    }

    pub(crate) fn restore(self, state: &mut MatchState) {
        state.teams = self.teams;
        state.current_set = self.current_set;
        state.server = self.server;
        state.serve_order = self.serve_order;
        state.serve_cursor = self.serve_cursor;
        state.tiebreak = self.tiebreak;
        state.over = self.over;
        state.winner = self.winner;
        state.stats = self.stats;
        state.log.truncate(self.log_len);
        state.phase = Phase::Scoring;
        state.first_serve_faulted = false;
        state.pending_reason = None;
        state.pending_timestamp = None;
    }
}

/// Stack of snapshots, most recent on top.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryStack(Vec<Snapshot>);

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        self.0.push(snapshot);
    }

    pub fn pop(&mut self) -> Option<Snapshot> {
        self.0.pop()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
