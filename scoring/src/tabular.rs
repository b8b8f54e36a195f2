//! Flat tabular (CSV) export and heuristic import of a match's event log.
//!
//! Export is exact: one row per point in play order, every field quoted.
//! Import has no authoritative state to lean on, so teams and game tallies
//! are inferred from the rows; the result carries [`Approximation`] markers
//! wherever a heuristic filled a gap instead of a known fact.

use court::{
    describe_point, Player, PointEvent, RallyOutcome, RallyRecord, SeatId, ServeRecord, TeamId,
};
use serde::{Deserialize, Serialize};

/// Exact header row; import requires this column order.
pub const HEADER: &str = "PointNumber,SetNumber,ScoreAtPointStart,PointWinner(Team),Server,\
ServeOutcome,PointOutcome,PlayerResponsible,FinishedAtNet,WasOnReturnOfServe,VideoTimestamp";

const FIELDS: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TabularError {
    #[error("input has no rows")]
    Empty,
    #[error("header row does not match the expected column order")]
    HeaderMismatch,
    #[error("row {line} has fewer than {FIELDS} fields")]
    ShortRow { line: usize },
    #[error("row {line}: cannot parse {field}")]
    BadNumber { line: usize, field: &'static str },
    #[error("row {line}: unknown point winner {value:?}")]
    UnknownTeam { line: usize, value: String },
    #[error("row {line}: unknown point outcome {value:?}")]
    UnknownOutcome { line: usize, value: String },
}

/// Where the reconstruction had to guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Approximation {
    /// Fewer than two distinct names were found for a side; placeholders
    /// were added.
    PaddedRoster { team: TeamId },
    /// A name in a row could not be mapped to an inferred seat; the point
    /// was attributed to seat 0.
    UnresolvedName { name: String },
    /// The final row's winner was credited with a game even though the
    /// export carries no explicit game-complete sentinel. Overcounts by
    /// one for a match exported mid-game.
    FinalGameCredited,
}

/// Best-effort match rebuilt from exported rows.
///
/// Distinct from an authoritative live state: game tallies and rosters are
/// inferred, and `approximations` lists every guess that was made.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructedMatch {
    pub players: [Player; 4],
    pub events: Vec<PointEvent>,
    /// Per-set game tallies, one `Vec` per team.
    pub games: [Vec<u32>; 2],
    pub winner: Option<TeamId>,
    pub approximations: Vec<Approximation>,
}

/// Derived serve-outcome label for one event.
pub fn serve_outcome_label(serve: &ServeRecord) -> &'static str {
    if serve.ace {
        "Ace"
    } else if serve.double_fault {
        "Double Fault"
    } else if serve.first_serve_in {
        "1st Serve In"
    } else {
        "2nd Serve In"
    }
}

/// Encode an event log as CSV, one row per point in play order.
pub fn encode(events: &[PointEvent], players: &[Player; 4]) -> String {
    let name = |seat: SeatId| players[seat.index()].name.clone();
    let mut out = String::from(HEADER);
    for (index, event) in events.iter().enumerate() {
        let responsible = match event.rally {
            Some(rally) => name(rally.ending_player),
            None => name(event.serve.server),
        };
        let yes_no = |flag: bool| if flag { "Yes" } else { "No" };
        let fields: [String; FIELDS] = [
            (index + 1).to_string(),
            (event.set + 1).to_string(),
            event.score.clone(),
            event.winner.to_string(),
            name(event.serve.server),
            serve_outcome_label(&event.serve).to_string(),
            event.rally.map(|r| r.outcome.as_str().to_string()).unwrap_or_default(),
            responsible,
            event.rally.map(|r| yes_no(r.at_net).to_string()).unwrap_or_default(),
            event.rally.map(|r| yes_no(r.is_return).to_string()).unwrap_or_default(),
            event.timestamp.map(|t| t.to_string()).unwrap_or_default(),
        ];
        out.push('\n');
        let row = fields
            .iter()
            .map(|f| escape(f))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&row);
    }
    out
}

fn escape(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Split one CSV line honouring double-quote escaping.
fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ',' if !in_quotes => {
                fields.push(unquote(&current));
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(unquote(&current));
    fields
}

fn unquote(field: &str) -> String {
    let field = field.trim_end_matches('\r');
    if field.len() >= 2 && field.starts_with('"') && field.ends_with('"') {
        field[1..field.len() - 1].replace("\"\"", "\"")
    } else {
        field.to_string()
    }
}

/// Decode exported rows back into an approximate match.
pub fn decode(text: &str) -> Result<ReconstructedMatch, TabularError> {
    let mut lines = text
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty());
    let header = lines.next().ok_or(TabularError::Empty)?;
    if header != HEADER {
        return Err(TabularError::HeaderMismatch);
    }

    let mut rows = Vec::new();
    for (index, line) in lines.enumerate() {
        let fields = parse_line(line);
        if fields.len() < FIELDS {
            return Err(TabularError::ShortRow { line: index + 2 });
        }
        rows.push((index + 2, fields));
    }

    let mut approximations = Vec::new();
    let players = infer_rosters(&rows, &mut approximations);
    let mut seat_of = std::collections::HashMap::new();
    for player in &players {
        seat_of.insert(player.name.clone(), player.seat);
    }

    let mut events = Vec::with_capacity(rows.len());
    for (id, (line, fields)) in rows.iter().enumerate() {
        events.push(rebuild_event(id, *line, fields, &seat_of, &players, &mut approximations)?);
    }

    let games = infer_games(&events, &mut approximations);
    let winner = infer_winner(&games);

    Ok(ReconstructedMatch {
        players,
        events,
        games,
        winner,
        approximations,
    })
}

/// Scan rows for names that can be pinned to a side: aces and winners
/// credit the winning team, errors count against the attributed player,
/// and double faults pin the server to the losing side.
fn infer_rosters(
    rows: &[(usize, Vec<String>)],
    approximations: &mut Vec<Approximation>,
) -> [Player; 4] {
    let mut sides: [Vec<String>; 2] = [Vec::new(), Vec::new()];
    let mut add = |side: usize, name: &str| {
        if !name.is_empty() && !sides[side].iter().any(|n| n == name) {
            sides[side].push(name.to_string());
        }
    };

    for (_, fields) in rows {
        let Some(winner) = parse_team(&fields[3]) else {
            continue;
        };
        let (won, lost) = (winner.index(), winner.other().index());
        if fields[5] == "Ace" {
            add(won, &fields[4]);
        }
        match fields[6].as_str() {
            "Winner" => add(won, &fields[7]),
            "Unforced Error" | "Forced Error" => add(lost, &fields[7]),
            _ => {}
        }
    }
    // Double-fault fallback for servers who never show up elsewhere.
    for (_, fields) in rows {
        let Some(winner) = parse_team(&fields[3]) else {
            continue;
        };
        if fields[5] == "Double Fault" {
            add(winner.other().index(), &fields[4]);
        }
    }

    for (side, team) in [(0, TeamId::A), (1, TeamId::B)] {
        if sides[side].len() < 2 {
            approximations.push(Approximation::PaddedRoster { team });
        }
        while sides[side].len() < 2 {
            let n = sides[side].len() + 1;
            sides[side].push(format!("Unknown T{}-{}", team.number(), n));
        }
    }

    std::array::from_fn(|i| Player {
        seat: SeatId::SEATS[i],
        profile_id: String::new(),
        name: sides[i / 2][i % 2].clone(),
    })
}

fn parse_team(value: &str) -> Option<TeamId> {
    match value {
        "Team 1" => Some(TeamId::A),
        "Team 2" => Some(TeamId::B),
        _ => None,
    }
}

fn rebuild_event(
    id: usize,
    line: usize,
    fields: &[String],
    seat_of: &std::collections::HashMap<String, SeatId>,
    players: &[Player; 4],
    approximations: &mut Vec<Approximation>,
) -> Result<PointEvent, TabularError> {
    let set: usize = fields[1]
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or(TabularError::BadNumber {
            line,
            field: "SetNumber",
        })?;
    let winner = parse_team(&fields[3]).ok_or_else(|| TabularError::UnknownTeam {
        line,
        value: fields[3].clone(),
    })?;
    let timestamp = if fields[10].is_empty() {
        None
    } else {
        Some(fields[10].parse::<f64>().map_err(|_| TabularError::BadNumber {
            line,
            field: "VideoTimestamp",
        })?)
    };

    let mut resolve = |name: &str| match seat_of.get(name) {
        Some(&seat) => seat,
        None => {
            approximations.push(Approximation::UnresolvedName {
                name: name.to_string(),
            });
            SeatId::SEATS[0]
        }
    };

    let serve_outcome = fields[5].as_str();
    let serve = ServeRecord {
        server: resolve(&fields[4]),
        first_serve_in: serve_outcome == "Ace" || serve_outcome == "1st Serve In",
        ace: serve_outcome == "Ace",
        double_fault: serve_outcome == "Double Fault",
    };
    let rally = if serve.ace || serve.double_fault {
        None
    } else {
        let outcome =
            RallyOutcome::from_str_label(&fields[6]).ok_or_else(|| TabularError::UnknownOutcome {
                line,
                value: fields[6].clone(),
            })?;
        Some(RallyRecord {
            ending_player: resolve(&fields[7]),
            outcome,
            at_net: fields[8] == "Yes",
            is_return: fields[9] == "Yes",
        })
    };

    let description = describe_point(&serve, rally.as_ref(), &|seat| {
        players[seat.index()].name.clone()
    });

    Ok(PointEvent {
        id,
        score: fields[2].clone(),
        description,
        set,
        timestamp,
        winner,
        serve,
        rally,
    })
}

/// Infer per-set game tallies.
///
/// A set-index increase means the previous row ended its set; a `0-0` score
/// label means the previous row ended a game. The final row's winner is
/// always credited with one game since no explicit sentinel exists.
fn infer_games(events: &[PointEvent], approximations: &mut Vec<Approximation>) -> [Vec<u32>; 2] {
    let mut games: [Vec<u32>; 2] = [vec![0], vec![0]];

    fn credit(games: &mut [Vec<u32>; 2], team: TeamId, set: usize) {
        for side in games.iter_mut() {
            while side.len() <= set {
                side.push(0);
            }
        }
        games[team.index()][set] += 1;
    }

    for i in 1..events.len() {
        let prev = &events[i - 1];
        let current = &events[i];
        if current.set > prev.set {
            credit(&mut games, prev.winner, prev.set);
        } else if current.set == prev.set && current.score == "0-0" {
            credit(&mut games, prev.winner, current.set);
        }
    }

    if let Some(last) = events.last() {
        credit(&mut games, last.winner, last.set);
        approximations.push(Approximation::FinalGameCredited);
    }
    games
}

fn infer_winner(games: &[Vec<u32>; 2]) -> Option<TeamId> {
    let mut sets = [0u32; 2];
    for (a, b) in games[0].iter().zip(games[1].iter()) {
        if a > b && *a >= 6 {
            sets[0] += 1;
        }
        if b > a && *b >= 6 {
            sets[1] += 1;
        }
    }
    match sets[0].cmp(&sets[1]) {
        std::cmp::Ordering::Greater => Some(TeamId::A),
        std::cmp::Ordering::Less => Some(TeamId::B),
        std::cmp::Ordering::Equal => None,
    }
}
