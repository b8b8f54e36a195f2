//! The per-player counter set and the per-seat in-match table.

use court::SeatId;
use serde::{Deserialize, Serialize};

/// Independent counters tracked for one player.
///
/// Derived entirely from the event log; never hand-edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    // Point endings
    pub winners: u32,
    pub aces: u32,
    pub unforced_errors: u32,
    pub forced_errors: u32,
    pub double_faults: u32,

    // Serving
    pub first_serves_in: u32,
    pub first_serves_total: u32,
    pub second_serves_won: u32,
    pub second_serves_total: u32,
    pub serves_unreturned: u32,

    // Returning
    pub return_points_won: u32,
    pub return_points_total: u32,
    pub return_winners: u32,
    pub return_unforced_errors: u32,

    // Net play
    pub net_points_approached: u32,
    pub net_points_won: u32,

    // Overall
    pub points_won: u32,
    pub points_lost: u32,
}

impl PlayerStats {
    /// Add another match's counters into this one, for profile aggregation.
    pub fn add(&mut self, other: &PlayerStats) {
        self.winners += other.winners;
        self.aces += other.aces;
        self.unforced_errors += other.unforced_errors;
        self.forced_errors += other.forced_errors;
        self.double_faults += other.double_faults;
        self.first_serves_in += other.first_serves_in;
        self.first_serves_total += other.first_serves_total;
        self.second_serves_won += other.second_serves_won;
        self.second_serves_total += other.second_serves_total;
        self.serves_unreturned += other.serves_unreturned;
        self.return_points_won += other.return_points_won;
        self.return_points_total += other.return_points_total;
        self.return_winners += other.return_winners;
        self.return_unforced_errors += other.return_unforced_errors;
        self.net_points_approached += other.net_points_approached;
        self.net_points_won += other.net_points_won;
        self.points_won += other.points_won;
        self.points_lost += other.points_lost;
    }
}

/// In-match statistics keyed by seat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsTable([PlayerStats; 4]);

impl StatsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seats(&self) -> impl Iterator<Item = (SeatId, &PlayerStats)> {
        SeatId::all().zip(self.0.iter())
    }
}

impl std::ops::Index<SeatId> for StatsTable {
    type Output = PlayerStats;

    fn index(&self, seat: SeatId) -> &PlayerStats {
        &self.0[seat.index()]
    }
}

impl std::ops::IndexMut<SeatId> for StatsTable {
    fn index_mut(&mut self, seat: SeatId) -> &mut PlayerStats {
        &mut self.0[seat.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_accumulates_every_counter() {
        let mut a = PlayerStats {
            winners: 1,
            points_won: 5,
            ..Default::default()
        };
        let b = PlayerStats {
            winners: 2,
            aces: 1,
            points_lost: 3,
            ..Default::default()
        };
        a.add(&b);
        assert_eq!(a.winners, 3);
        assert_eq!(a.aces, 1);
        assert_eq!(a.points_won, 5);
        assert_eq!(a.points_lost, 3);
    }

    #[test]
    fn table_indexes_by_seat() {
        let mut table = StatsTable::new();
        let seat = SeatId::new(2).unwrap();
        table[seat].aces = 4;
        assert_eq!(table[seat].aces, 4);
        assert_eq!(table.seats().count(), 4);
    }

    #[test]
    fn stats_serialize_with_camel_case_keys() {
        let json = serde_json::to_string(&PlayerStats::default()).unwrap();
        assert!(json.contains("\"firstServesTotal\""));
        assert!(json.contains("\"netPointsApproached\""));
    }
}
