//! Per-event update rules and the batch recomputation fold.

use std::collections::HashMap;

use court::{Player, PointEvent, RallyOutcome, SeatId};

use crate::table::{PlayerStats, StatsTable};

/// Apply one resolved point to the table.
///
/// This is the single definition of the per-event rules. The live state
/// machine calls it once per point; [`recompute`] folds it over a stored
/// log. Keeping one implementation is what makes the two paths agree
/// byte-for-byte.
pub fn apply_event(table: &mut StatsTable, event: &PointEvent) {
    for seat in SeatId::all() {
        if seat.team() == event.winner {
            table[seat].points_won += 1;
        } else {
            table[seat].points_lost += 1;
        }
    }

    let server = event.serve.server;
    let serving_team = server.team();
    table[server].first_serves_total += 1;

    if event.serve.ace {
        table[server].first_serves_in += 1;
        table[server].aces += 1;
        table[server].winners += 1;
    }
    if event.serve.double_fault {
        table[server].second_serves_total += 1;
        table[server].double_faults += 1;
        table[server].unforced_errors += 1;
    }

    let Some(rally) = event.rally else {
        return;
    };

    if event.serve.first_serve_in {
        table[server].first_serves_in += 1;
    } else {
        table[server].second_serves_total += 1;
        if event.winner == serving_team {
            table[server].second_serves_won += 1;
        }
    }

    // Return points are credited to both players on the receiving side.
    let receiving_team = serving_team.other();
    for seat in SeatId::all().filter(|s| s.team() == receiving_team) {
        table[seat].return_points_total += 1;
        if event.winner == receiving_team {
            table[seat].return_points_won += 1;
        }
    }

    let ending = rally.ending_player;
    match rally.outcome {
        RallyOutcome::Winner => {
            table[ending].winners += 1;
            if rally.is_return {
                table[ending].return_winners += 1;
            }
        }
        RallyOutcome::ForcedError => {
            table[ending].forced_errors += 1;
            if rally.is_return {
                table[server].serves_unreturned += 1;
            }
        }
        RallyOutcome::UnforcedError => {
            table[ending].unforced_errors += 1;
            if rally.is_return {
                table[ending].return_unforced_errors += 1;
            }
        }
    }

    if rally.at_net {
        table[ending].net_points_approached += 1;
        if event.winner == ending.team() {
            table[ending].net_points_won += 1;
        }
    }
}

/// Recompute the full table from a stored log in one pass.
pub fn recompute(events: &[PointEvent]) -> StatsTable {
    let mut table = StatsTable::new();
    for event in events {
        apply_event(&mut table, event);
    }
    table
}

/// Re-key a seat table by stable profile id.
pub fn by_profile(table: &StatsTable, players: &[Player; 4]) -> HashMap<String, PlayerStats> {
    players
        .iter()
        .map(|p| (p.profile_id.clone(), table[p.seat]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use court::{RallyRecord, ServeRecord, TeamId};

    fn seat(n: u8) -> SeatId {
        SeatId::new(n).unwrap()
    }

    fn ace_event(id: usize) -> PointEvent {
        PointEvent {
            id,
            score: String::new(),
            description: String::new(),
            set: 0,
            timestamp: None,
            winner: TeamId::A,
            serve: ServeRecord {
                server: seat(0),
                first_serve_in: true,
                ace: true,
                double_fault: false,
            },
            rally: None,
        }
    }

    fn rally_event(
        id: usize,
        winner: TeamId,
        first_serve_in: bool,
        rally: RallyRecord,
    ) -> PointEvent {
        PointEvent {
            id,
            score: String::new(),
            description: String::new(),
            set: 0,
            timestamp: None,
            winner,
            serve: ServeRecord {
                server: seat(0),
                first_serve_in,
                ace: false,
                double_fault: false,
            },
            rally: Some(rally),
        }
    }

    #[test]
    fn ace_credits_server() {
        let table = recompute(&[ace_event(0)]);
        let s = &table[seat(0)];
        assert_eq!(s.aces, 1);
        assert_eq!(s.winners, 1);
        assert_eq!(s.first_serves_in, 1);
        assert_eq!(s.first_serves_total, 1);
        assert_eq!(s.points_won, 1);
        assert_eq!(table[seat(1)].points_won, 1);
        assert_eq!(table[seat(2)].points_lost, 1);
        // Aces carry no rally record, so no return point is recorded.
        assert_eq!(table[seat(2)].return_points_total, 0);
    }

    #[test]
    fn double_fault_charges_server() {
        let mut event = ace_event(0);
        event.winner = TeamId::B;
        event.serve = ServeRecord {
            server: seat(0),
            first_serve_in: false,
            ace: false,
            double_fault: true,
        };
        let table = recompute(&[event]);
        let s = &table[seat(0)];
        assert_eq!(s.double_faults, 1);
        assert_eq!(s.unforced_errors, 1);
        assert_eq!(s.first_serves_total, 1);
        assert_eq!(s.second_serves_total, 1);
        assert_eq!(s.points_lost, 1);
    }

    #[test]
    fn return_points_credit_both_receivers() {
        let event = rally_event(
            0,
            TeamId::B,
            true,
            RallyRecord {
                ending_player: seat(2),
                outcome: RallyOutcome::Winner,
                at_net: false,
                is_return: true,
            },
        );
        let table = recompute(&[event]);
        for s in [seat(2), seat(3)] {
            assert_eq!(table[s].return_points_total, 1);
            assert_eq!(table[s].return_points_won, 1);
        }
        assert_eq!(table[seat(2)].winners, 1);
        assert_eq!(table[seat(2)].return_winners, 1);
        assert_eq!(table[seat(0)].first_serves_in, 1);
    }

    #[test]
    fn second_serve_won_only_for_serving_team() {
        let rally = RallyRecord {
            ending_player: seat(2),
            outcome: RallyOutcome::UnforcedError,
            at_net: false,
            is_return: false,
        };
        let table = recompute(&[rally_event(0, TeamId::A, false, rally)]);
        let s = &table[seat(0)];
        assert_eq!(s.second_serves_total, 1);
        assert_eq!(s.second_serves_won, 1);
        assert_eq!(table[seat(2)].unforced_errors, 1);

        let table = recompute(&[rally_event(0, TeamId::B, false, RallyRecord {
            ending_player: seat(0),
            outcome: RallyOutcome::UnforcedError,
            at_net: false,
            is_return: false,
        })]);
        assert_eq!(table[seat(0)].second_serves_won, 0);
    }

    #[test]
    fn unreturned_serve_goes_to_server() {
        let rally = RallyRecord {
            ending_player: seat(2),
            outcome: RallyOutcome::ForcedError,
            at_net: false,
            is_return: true,
        };
        let table = recompute(&[rally_event(0, TeamId::A, true, rally)]);
        assert_eq!(table[seat(0)].serves_unreturned, 1);
        assert_eq!(table[seat(2)].forced_errors, 1);
    }

    #[test]
    fn net_points_won_requires_winning_team() {
        let rally = RallyRecord {
            ending_player: seat(2),
            outcome: RallyOutcome::UnforcedError,
            at_net: true,
            is_return: false,
        };
        // Seat 2 erred at net; approach counted, win not.
        let table = recompute(&[rally_event(0, TeamId::A, true, rally)]);
        assert_eq!(table[seat(2)].net_points_approached, 1);
        assert_eq!(table[seat(2)].net_points_won, 0);
    }

    #[test]
    fn recompute_matches_incremental_fold() {
        let events = vec![
            ace_event(0),
            rally_event(
                1,
                TeamId::B,
                false,
                RallyRecord {
                    ending_player: seat(3),
                    outcome: RallyOutcome::Winner,
                    at_net: true,
                    is_return: false,
                },
            ),
            rally_event(
                2,
                TeamId::A,
                true,
                RallyRecord {
                    ending_player: seat(1),
                    outcome: RallyOutcome::Winner,
                    at_net: false,
                    is_return: false,
                },
            ),
        ];
        let mut incremental = StatsTable::new();
        for event in &events {
            apply_event(&mut incremental, event);
        }
        assert_eq!(recompute(&events), incremental);
    }

    #[test]
    fn by_profile_keys_on_profile_id() {
        let players: [Player; 4] = std::array::from_fn(|i| Player {
            seat: seat(i as u8),
            profile_id: format!("profile-{i}"),
            name: format!("P{i}"),
        });
        let table = recompute(&[ace_event(0)]);
        let map = by_profile(&table, &players);
        assert_eq!(map.len(), 4);
        assert_eq!(map["profile-0"].aces, 1);
        assert_eq!(map["profile-2"].points_lost, 1);
    }
}
