//! The score state machine: owns all mutable match state and consumes
//! commands, producing one immutable [`PointEvent`] per resolved point.

use court::{
    describe_point, Player, PointEvent, RallyOutcome, RallyRecord, SeatId, ServeEnding,
    ServeRecord, TeamId,
};
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use stats::StatsTable;

use crate::commands::{MatchCommand, MatchError, PlayerSpec};
use crate::history::{HistoryStack, Snapshot};
use crate::score;

/// Interaction mode of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the opening server of the current set.
    SelectingFirstServer,
    /// Waiting for the receiving team to nominate its serving player,
    /// which fixes the 4-seat rotation order.
    SelectingSecondServer,
    /// Ready to score the next point.
    Scoring,
    /// A rally outcome was awarded and awaits player attribution.
    AttributingRally,
    /// Terminal; only undo or a reset leaves this phase.
    MatchOver,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::SelectingFirstServer => "selecting the first server",
            Self::SelectingSecondServer => "selecting the second server",
            Self::Scoring => "scoring",
            Self::AttributingRally => "attributing a rally",
            Self::MatchOver => "the match is over",
        };
        f.write_str(label)
    }
}

/// One side of the match: two players, a per-set game tally and the
/// current in-game point count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub(crate) players: [Player; 2],
    /// One entry per set played.
    pub(crate) games: SmallVec<[u32; 3]>,
    pub(crate) points: u32,
    pub(crate) serving: bool,
}

impl Team {
    fn new(id: TeamId, specs: [PlayerSpec; 2]) -> Self {
        let base = if id == TeamId::A { 0 } else { 2 };
        let player = |offset: usize, spec: &PlayerSpec| Player {
            seat: SeatId::SEATS[base + offset],
            profile_id: spec.profile_id.clone(),
            name: spec.name.clone(),
        };
        Self {
            players: [player(0, &specs[0]), player(1, &specs[1])],
            games: smallvec![0],
            points: 0,
            serving: id == TeamId::A,
        }
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    /// Game tally, one entry per set played.
    pub fn games(&self) -> &[u32] {
        &self.games
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn is_serving(&self) -> bool {
        self.serving
    }
}

/// Live state of one doubles match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub(crate) teams: [Team; 2],
    pub(crate) current_set: usize,
    pub(crate) server: SeatId,
    /// Fixed 4-seat rotation once the second server is confirmed; holds
    /// only the first server until then.
    pub(crate) serve_order: SmallVec<[SeatId; 4]>,
    pub(crate) serve_cursor: usize,
    pub(crate) tiebreak: bool,
    pub(crate) over: bool,
    pub(crate) winner: Option<TeamId>,
    pub(crate) stats: StatsTable,
    pub(crate) log: Vec<PointEvent>,
    pub(crate) history: HistoryStack,
    pub(crate) phase: Phase,
    pub(crate) started: bool,
    pub(crate) first_serve_faulted: bool,
    pub(crate) pending_reason: Option<RallyOutcome>,
    pub(crate) pending_timestamp: Option<f64>,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchState {
    /// An idle machine with no match in progress.
    pub fn new() -> Self {
        let placeholder = |_: u8| PlayerSpec::new("", "");
        Self {
            teams: [
                Team::new(TeamId::A, [placeholder(0), placeholder(1)]),
                Team::new(TeamId::B, [placeholder(2), placeholder(3)]),
            ],
            current_set: 0,
            server: SeatId::SEATS[0],
            serve_order: SmallVec::new(),
            serve_cursor: 0,
            tiebreak: false,
            over: false,
            winner: None,
            stats: StatsTable::new(),
            log: Vec::new(),
            history: HistoryStack::new(),
            phase: Phase::Scoring,
            started: false,
            first_serve_faulted: false,
            pending_reason: None,
            pending_timestamp: None,
        }
    }

    /// Start a match with the given rosters. Rejects lineups without four
    /// distinct, non-empty player names before any state is created.
    pub fn start(
        team_a: [PlayerSpec; 2],
        team_b: [PlayerSpec; 2],
    ) -> Result<Self, MatchError> {
        let names: Vec<&str> = team_a
            .iter()
            .chain(team_b.iter())
            .map(|s| s.name.trim())
            .collect();
        if names.iter().any(|n| n.is_empty()) {
            return Err(MatchError::InvalidLineup);
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(MatchError::InvalidLineup);
            }
        }
        let profile_ids: Vec<&str> = team_a
            .iter()
            .chain(team_b.iter())
            .map(|s| s.profile_id.as_str())
            .filter(|id| !id.is_empty())
            .collect();
        for (i, id) in profile_ids.iter().enumerate() {
            if profile_ids[..i].contains(id) {
                return Err(MatchError::InvalidLineup);
            }
        }

        let mut state = Self::new();
        state.teams = [Team::new(TeamId::A, team_a), Team::new(TeamId::B, team_b)];
        state.started = true;
        state.phase = Phase::SelectingFirstServer;
        Ok(state)
    }

    /// Dispatch one command.
    pub fn apply(&mut self, command: MatchCommand) -> Result<(), MatchError> {
        match command {
            MatchCommand::StartMatch { team_a, team_b } => {
                *self = Self::start(team_a, team_b)?;
                Ok(())
            }
            MatchCommand::SelectFirstServer { seat } => self.select_first_server(seat),
            MatchCommand::ConfirmSecondServer { seat } => self.confirm_second_server(seat),
            MatchCommand::FirstServeFault => self.first_serve_fault(),
            MatchCommand::QuickAttributePoint { reason, timestamp } => {
                self.quick_point(reason, timestamp)
            }
            MatchCommand::AwardRallyStart { reason, timestamp } => {
                self.award_rally_start(reason, timestamp)
            }
            MatchCommand::AttributeRally {
                ending_player,
                at_net,
                is_return,
            } => self.attribute_rally(ending_player, at_net, is_return),
            MatchCommand::CancelPoint => self.cancel_point(),
            MatchCommand::UndoLastPoint => self.undo().map(|_| ()),
            MatchCommand::ResetState => {
                self.reset();
                Ok(())
            }
            MatchCommand::ResumeMatch { state } => {
                self.resume(*state);
                Ok(())
            }
        }
    }

    /// Fix the opening server of the current set.
    ///
    /// For a tiebreak set the full rotation must be known before the first
    /// point, so this moves straight to second-server selection; a normal
    /// set plays its first game before the partner order is fixed.
    pub fn select_first_server(&mut self, seat: SeatId) -> Result<(), MatchError> {
        self.require_started()?;
        self.require_phase(Phase::SelectingFirstServer, "SelectFirstServer")?;
        self.serve_order = smallvec![seat];
        self.serve_cursor = 0;
        self.server = seat;
        self.update_serving_flags();
        self.phase = if self.tiebreak {
            Phase::SelectingSecondServer
        } else {
            Phase::Scoring
        };
        Ok(())
    }

    /// The receiving team nominates its server, fixing the rotation order
    /// `[first, second, first's partner, second's partner]`. A normal set
    /// resumes at rotation index 1 (the second server opens game 2); a
    /// tiebreak starts at index 0.
    pub fn confirm_second_server(&mut self, seat: SeatId) -> Result<(), MatchError> {
        self.require_started()?;
        self.require_phase(Phase::SelectingSecondServer, "ConfirmSecondServer")?;
        let Some(&first) = self.serve_order.first() else {
            return Err(MatchError::WrongPhase {
                command: "ConfirmSecondServer",
                phase: self.phase,
            });
        };
        if seat.team() == first.team() {
            return Err(MatchError::InvalidServerSelection);
        }
        self.serve_order = smallvec![first, seat, first.partner(), seat.partner()];
        self.serve_cursor = if self.tiebreak { 0 } else { 1 };
        self.server = self.serve_order[self.serve_cursor];
        self.update_serving_flags();
        self.phase = Phase::Scoring;
        Ok(())
    }

    /// Record that the first serve of the current point missed.
    pub fn first_serve_fault(&mut self) -> Result<(), MatchError> {
        self.require_started()?;
        self.require_phase(Phase::Scoring, "FirstServeFault")?;
        self.first_serve_faulted = true;
        Ok(())
    }

    /// Resolve the point immediately on the serve: an ace for the serving
    /// team or a double fault against it.
    pub fn quick_point(
        &mut self,
        reason: ServeEnding,
        timestamp: Option<f64>,
    ) -> Result<(), MatchError> {
        self.require_started()?;
        self.require_phase(Phase::Scoring, "QuickAttributePoint")?;
        self.history.push(Snapshot::capture(self));

        let ace = reason == ServeEnding::Ace;
        let serve = ServeRecord {
            server: self.server,
            // An ace counts as a made first serve even after a fault.
            first_serve_in: ace,
            ace,
            double_fault: !ace,
        };
        let winner = if ace {
            self.server.team()
        } else {
            self.server.team().other()
        };
        self.apply_point(winner, serve, None, timestamp);
        Ok(())
    }

    /// Record how the rally ended and wait for player attribution.
    pub fn award_rally_start(
        &mut self,
        reason: RallyOutcome,
        timestamp: Option<f64>,
    ) -> Result<(), MatchError> {
        self.require_started()?;
        self.require_phase(Phase::Scoring, "AwardRallyStart")?;
        self.pending_reason = Some(reason);
        self.pending_timestamp = timestamp;
        self.phase = Phase::AttributingRally;
        Ok(())
    }

    /// Attribute the pending rally to the player who ended it and resolve
    /// the point.
    pub fn attribute_rally(
        &mut self,
        ending_player: SeatId,
        at_net: bool,
        is_return: bool,
    ) -> Result<(), MatchError> {
        self.require_started()?;
        self.require_phase(Phase::AttributingRally, "AttributeRally")?;
        // Awarding is the only way into this phase and always sets the reason.
        let Some(reason) = self.pending_reason else {
            return Err(MatchError::WrongPhase {
                command: "AttributeRally",
                phase: self.phase,
            });
        };
        self.history.push(Snapshot::capture(self));

        let serve = ServeRecord {
            server: self.server,
            first_serve_in: !self.first_serve_faulted,
            ace: false,
            double_fault: false,
        };
        let rally = RallyRecord {
            ending_player,
            outcome: reason,
            at_net,
            is_return,
        };
        let winner = match reason {
            RallyOutcome::Winner => ending_player.team(),
            RallyOutcome::ForcedError | RallyOutcome::UnforcedError => {
                ending_player.team().other()
            }
        };
        let timestamp = self.pending_timestamp;
        self.apply_point(winner, serve, Some(rally), timestamp);
        Ok(())
    }

    /// Discard the pending rally outcome without scoring anything.
    pub fn cancel_point(&mut self) -> Result<(), MatchError> {
        self.require_started()?;
        self.require_phase(Phase::AttributingRally, "CancelPoint")?;
        self.pending_reason = None;
        self.pending_timestamp = None;
        self.phase = Phase::Scoring;
        Ok(())
    }

    /// Roll back the most recent resolved point. Returns false when there
    /// is nothing to undo. Rejected mid-attribution.
    pub fn undo(&mut self) -> Result<bool, MatchError> {
        if self.phase == Phase::AttributingRally {
            return Err(MatchError::UndoDuringAttribution);
        }
        match self.history.pop() {
            Some(snapshot) => {
                snapshot.restore(self);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drop everything and return to the idle state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Replace the live state with a previously saved one.
    pub fn resume(&mut self, state: MatchState) {
        *self = state;
    }

    // --- accessors ---

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn winner(&self) -> Option<TeamId> {
        self.winner
    }

    pub fn is_tiebreak(&self) -> bool {
        self.tiebreak
    }

    pub fn current_set(&self) -> usize {
        self.current_set
    }

    pub fn server(&self) -> SeatId {
        self.server
    }

    pub fn serve_order(&self) -> &[SeatId] {
        &self.serve_order
    }

    pub fn team(&self, id: TeamId) -> &Team {
        &self.teams[id.index()]
    }

    pub fn player(&self, seat: SeatId) -> &Player {
        &self.teams[seat.team().index()].players[seat.index() % 2]
    }

    /// All four players in seat order.
    pub fn players(&self) -> [Player; 4] {
        std::array::from_fn(|i| self.player(SeatId::SEATS[i]).clone())
    }

    pub fn stats(&self) -> &StatsTable {
        &self.stats
    }

    pub fn events(&self) -> &[PointEvent] {
        &self.log
    }

    pub fn pending_reason(&self) -> Option<RallyOutcome> {
        self.pending_reason
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Per-set game tallies as "a-b" pairs, e.g. "6-4 3-6 10-7".
    pub fn score_line(&self) -> String {
        let sets = self.teams[0]
            .games
            .iter()
            .zip(self.teams[1].games.iter())
            .map(|(a, b)| format!("{a}-{b}"))
            .collect::<Vec<_>>();
        sets.join(" ")
    }

    // --- internals ---

    fn require_started(&self) -> Result<(), MatchError> {
        if self.started {
            Ok(())
        } else {
            Err(MatchError::NotStarted)
        }
    }

    fn require_phase(&self, phase: Phase, command: &'static str) -> Result<(), MatchError> {
        if self.over {
            return Err(MatchError::MatchOver);
        }
        if self.phase != phase {
            return Err(MatchError::WrongPhase {
                command,
                phase: self.phase,
            });
        }
        Ok(())
    }

    fn update_serving_flags(&mut self) {
        let serving = self.server.team();
        self.teams[0].serving = serving == TeamId::A;
        self.teams[1].serving = serving == TeamId::B;
    }

    /// Advance to the next seat in the fixed rotation order.
    fn rotate_server(&mut self) {
        if self.serve_order.len() == 4 {
            self.serve_cursor = (self.serve_cursor + 1) % 4;
            self.server = self.serve_order[self.serve_cursor];
            self.update_serving_flags();
        }
    }

    fn sets_won(&self) -> [u32; 2] {
        let mut won = [0, 0];
        for (a, b) in self.teams[0].games.iter().zip(self.teams[1].games.iter()) {
            if a > b {
                won[0] += 1;
            } else if b > a {
                won[1] += 1;
            }
        }
        won
    }

    /// Apply a resolved point: score label, event append, incremental stats,
    /// then game/set/match boundary handling and server rotation.
    fn apply_point(
        &mut self,
        winner: TeamId,
        serve: ServeRecord,
        rally: Option<RallyRecord>,
        timestamp: Option<f64>,
    ) {
        let wi = winner.index();
        let li = winner.other().index();
        self.teams[wi].points += 1;

        // The label reflects the incremented points before any game reset.
        let (a_points, b_points) = (self.teams[0].points, self.teams[1].points);
        let target = score::tiebreak_target(self.current_set);
        let game_complete = if self.tiebreak {
            score::tiebreak_won(self.teams[wi].points, self.teams[li].points, target)
        } else {
            score::game_won(self.teams[wi].points, self.teams[li].points)
        };
        let label = if self.tiebreak {
            let mut label = format!("{a_points}-{b_points}");
            if game_complete {
                label.push_str(" (Set)");
            }
            label
        } else if game_complete {
            "Game".to_string()
        } else {
            score::point_label(a_points, b_points, self.teams[0].serving)
        };

        let description = describe_point(&serve, rally.as_ref(), &|seat| {
            self.player(seat).name.clone()
        });
        let event = PointEvent {
            id: self.log.len(),
            score: label,
            description,
            set: self.current_set,
            timestamp,
            winner,
            serve,
            rally,
        };
        stats::apply_event(&mut self.stats, &event);
        self.log.push(event);

        let mut selecting = false;
        if self.tiebreak {
            if game_complete {
                // A tiebreak set is a single game; winning it ends the match.
                self.teams[wi].games[self.current_set] += 1;
                self.finish_match(winner);
            } else {
                // Serve changes after the first point, then every two.
                let total_points = self.teams[0].points + self.teams[1].points;
                if total_points % 2 == 1 {
                    self.rotate_server();
                }
            }
        } else if game_complete {
            self.teams[wi].games[self.current_set] += 1;
            self.teams[0].points = 0;
            self.teams[1].points = 0;

            let games_w = self.teams[wi].games[self.current_set];
            let games_l = self.teams[li].games[self.current_set];
            if score::set_won(games_w, games_l) {
                let sets = self.sets_won();
                if sets[wi] == 2 {
                    self.finish_match(winner);
                } else {
                    // A new set always starts with a fresh server decision.
                    self.current_set += 1;
                    self.teams[0].games.push(0);
                    self.teams[1].games.push(0);
                    if sets == [1, 1] {
                        self.tiebreak = true;
                    }
                    self.phase = Phase::SelectingFirstServer;
                    selecting = true;
                }
            } else if games_w + games_l == 1 {
                // First game of the set fixes the rotation next.
                self.phase = Phase::SelectingSecondServer;
                selecting = true;
            } else {
                self.rotate_server();
            }
        }

        self.first_serve_faulted = false;
        self.pending_reason = None;
        self.pending_timestamp = None;
        if !selecting && !self.over {
            self.phase = Phase::Scoring;
        }
    }

    fn finish_match(&mut self, winner: TeamId) {
        self.over = true;
        self.winner = Some(winner);
        self.phase = Phase::MatchOver;
    }
}
