use std::collections::HashMap;

use court::{Player, PointEvent, TeamId};
use scoring::tabular::ReconstructedMatch;
use scoring::MatchState;
use serde::{Deserialize, Serialize};
use stats::{by_profile, recompute, PlayerStats, StatsTable};

use crate::{now_timestamp, Storable};

/// How a stored match came to exist. Imported reconstructions carry
/// heuristic rosters and game tallies and are never resumable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOrigin {
    Live,
    Imported,
}

/// One side of a stored match: its pair and per-set game tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamEntry {
    pub players: [Player; 2],
    pub games: Vec<u32>,
}

/// A finished (or suspended) match as persisted on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub created_at: u64,
    pub teams: [TeamEntry; 2],
    pub winner: Option<TeamId>,
    /// Per-profile stat lines, keyed by profile id.
    pub stats: HashMap<String, PlayerStats>,
    pub events: Vec<PointEvent>,
    pub video_file: Option<String>,
    /// Full live state, kept while the match can still be resumed.
    pub resume_state: Option<MatchState>,
    pub origin: MatchOrigin,
}

/// Stat lines keyed by profile id. Players without a profile (placeholder
/// seats from an import) carry no line.
fn keyed_stats(table: &StatsTable, players: &[Player; 4]) -> HashMap<String, PlayerStats> {
    let mut stats = by_profile(table, players);
    stats.remove("");
    stats
}

impl Storable for MatchRecord {
    fn id(&self) -> &str {
        &self.match_id
    }
}

impl MatchRecord {
    /// Assemble a record from a live match. A match still in progress keeps
    /// its full state for resumption.
    pub fn from_live(state: &MatchState, video_file: Option<String>) -> Self {
        let players = state.players();
        let team_entry = |id: TeamId| {
            let team = state.team(id);
            TeamEntry {
                players: team.players().clone(),
                games: team.games().to_vec(),
            }
        };
        Self {
            match_id: uuid::Uuid::new_v4().to_string(),
            created_at: now_timestamp(),
            teams: [team_entry(TeamId::A), team_entry(TeamId::B)],
            winner: state.winner(),
            stats: keyed_stats(state.stats(), &players),
            events: state.events().to_vec(),
            video_file,
            resume_state: (!state.is_over()).then(|| state.clone()),
            origin: MatchOrigin::Live,
        }
    }

    /// Assemble a record from a decoded export. Stats are recomputed from
    /// the rebuilt log; profile ids are whatever the caller resolved onto
    /// the reconstructed players.
    pub fn from_reconstructed(recon: &ReconstructedMatch, video_file: Option<String>) -> Self {
        let table = recompute(&recon.events);
        let team_entry = |side: usize| TeamEntry {
            players: [recon.players[side * 2].clone(), recon.players[side * 2 + 1].clone()],
            games: recon.games[side].clone(),
        };
        Self {
            match_id: uuid::Uuid::new_v4().to_string(),
            created_at: now_timestamp(),
            teams: [team_entry(0), team_entry(1)],
            winner: recon.winner,
            stats: keyed_stats(&table, &recon.players),
            events: recon.events.clone(),
            video_file,
            resume_state: None,
            origin: MatchOrigin::Imported,
        }
    }

    /// All four players in seat order.
    pub fn players(&self) -> [Player; 4] {
        let p = |side: usize, i: usize| self.teams[side].players[i].clone();
        [p(0, 0), p(0, 1), p(1, 0), p(1, 1)]
    }

    /// Games line such as `6-4 3-6 7-6`, one pair per set.
    pub fn score_line(&self) -> String {
        self.teams[0]
            .games
            .iter()
            .zip(self.teams[1].games.iter())
            .map(|(a, b)| format!("{}-{}", a, b))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
