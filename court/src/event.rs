//! The immutable point-event record, unit of the append-only match log.

use serde::{Deserialize, Serialize};

use crate::types::{RallyOutcome, SeatId, TeamId};

/// Serve details for one point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServeRecord {
    pub server: SeatId,
    /// Whether the serve that settled the point was the first serve.
    pub first_serve_in: bool,
    pub ace: bool,
    pub double_fault: bool,
}

/// Rally details for one point. Absent exactly when the point ended on an
/// ace or a double fault.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RallyRecord {
    /// The player the point ending is attributed to.
    pub ending_player: SeatId,
    pub outcome: RallyOutcome,
    pub at_net: bool,
    /// True when the rally ended on the return of serve.
    pub is_return: bool,
}

/// Record of one completed point. Created once per resolved point, never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointEvent {
    /// Position in the match log.
    pub id: usize,
    /// Human-readable score label as of this point, e.g. "40-30" or "Game".
    pub score: String,
    pub description: String,
    /// 0-based set index.
    pub set: usize,
    /// Optional video timestamp in seconds.
    pub timestamp: Option<f64>,
    pub winner: TeamId,
    pub serve: ServeRecord,
    pub rally: Option<RallyRecord>,
}

/// Build the human-readable description for a point.
///
/// Shared by live scoring and the tabular decoder so a decoded log carries
/// byte-identical descriptions. `names` maps seats to display names.
pub fn describe_point(
    serve: &ServeRecord,
    rally: Option<&RallyRecord>,
    names: &dyn Fn(SeatId) -> String,
) -> String {
    let server = names(serve.server);
    if serve.ace {
        return format!("Ace by {server}");
    }
    if serve.double_fault {
        return format!("Double Fault by {server}");
    }
    let Some(rally) = rally else {
        return String::new();
    };
    let player = names(rally.ending_player);
    let mut description = match rally.outcome {
        RallyOutcome::Winner if rally.is_return => format!("Return Winner by {player}"),
        RallyOutcome::Winner => format!("Winner by {player}"),
        RallyOutcome::UnforcedError if rally.is_return => {
            format!("Return Unforced Error by {player}")
        }
        RallyOutcome::UnforcedError => format!("Unforced Error by {player}"),
        RallyOutcome::ForcedError if rally.is_return => {
            format!("Unreturned Serve (forced by {server})")
        }
        RallyOutcome::ForcedError => format!("Forced Error by {player}"),
    };
    if rally.at_net {
        description.push_str(" (at net)");
    }
    description
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(seat: SeatId) -> String {
        ["Ann", "Bea", "Cam", "Dee"][seat.index()].to_string()
    }

    fn serve(ace: bool, double_fault: bool) -> ServeRecord {
        ServeRecord {
            server: SeatId::new(0).unwrap(),
            first_serve_in: ace,
            ace,
            double_fault,
        }
    }

    #[test]
    fn serve_descriptions() {
        assert_eq!(
            describe_point(&serve(true, false), None, &names),
            "Ace by Ann"
        );
        assert_eq!(
            describe_point(&serve(false, true), None, &names),
            "Double Fault by Ann"
        );
    }

    #[test]
    fn rally_descriptions() {
        let rally = |outcome, at_net, is_return| RallyRecord {
            ending_player: SeatId::new(2).unwrap(),
            outcome,
            at_net,
            is_return,
        };
        let serve = serve(false, false);
        assert_eq!(
            describe_point(&serve, Some(&rally(RallyOutcome::Winner, false, true)), &names),
            "Return Winner by Cam"
        );
        assert_eq!(
            describe_point(&serve, Some(&rally(RallyOutcome::ForcedError, false, true)), &names),
            "Unreturned Serve (forced by Ann)"
        );
        assert_eq!(
            describe_point(&serve, Some(&rally(RallyOutcome::UnforcedError, true, false)), &names),
            "Unforced Error by Cam (at net)"
        );
    }

    #[test]
    fn point_event_serde_round_trip() {
        let event = PointEvent {
            id: 3,
            score: "40-30".to_string(),
            description: "Winner by Cam".to_string(),
            set: 0,
            timestamp: Some(12.5),
            winner: TeamId::B,
            serve: serve(false, false),
            rally: Some(RallyRecord {
                ending_player: SeatId::new(2).unwrap(),
                outcome: RallyOutcome::Winner,
                at_net: false,
                is_return: false,
            }),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: PointEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
