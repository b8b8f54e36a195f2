//! Game, set and match boundary arithmetic plus score labelling.

/// Points needed to take a tiebreak: 7, or 10 for the deciding-set
/// super-tiebreak (set index 2).
pub fn tiebreak_target(set_index: usize) -> u32 {
    if set_index == 2 {
        10
    } else {
        7
    }
}

/// A regular game is won at 4+ points with a two-point margin.
pub fn game_won(winner_points: u32, loser_points: u32) -> bool {
    winner_points >= 4 && winner_points - loser_points >= 2
}

/// A tiebreak is won at the target with a two-point margin.
pub fn tiebreak_won(winner_points: u32, loser_points: u32, target: u32) -> bool {
    winner_points >= target && winner_points - loser_points >= 2
}

/// A set is won at 6+ games with a two-game margin.
pub fn set_won(winner_games: u32, loser_games: u32) -> bool {
    winner_games >= 6 && winner_games - loser_games >= 2
}

/// Render the in-game score label from team A's perspective.
///
/// Below 3-3 points map onto {0, 15, 30, 40}; at deuce and beyond the label
/// is "Deuce" or "Ad-In"/"Ad-Out" relative to the serving team. Tiebreak
/// points render as raw integers and are handled by the caller.
pub fn point_label(a_points: u32, b_points: u32, a_serving: bool) -> String {
    if a_points >= 3 && a_points == b_points {
        return "Deuce".to_string();
    }
    if a_points > 3 || b_points > 3 {
        let a_leads = a_points > b_points;
        return if a_leads == a_serving {
            "Ad-In".to_string()
        } else {
            "Ad-Out".to_string()
        };
    }
    const MAP: [&str; 4] = ["0", "15", "30", "40"];
    format!("{}-{}", MAP[a_points as usize], MAP[b_points as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_requires_four_points_and_a_margin() {
        assert!(!game_won(3, 0));
        assert!(game_won(4, 0));
        assert!(game_won(4, 2));
        assert!(!game_won(4, 3));
        assert!(game_won(5, 3));
        assert!(!game_won(5, 4));
    }

    #[test]
    fn tiebreak_targets() {
        assert_eq!(tiebreak_target(0), 7);
        assert_eq!(tiebreak_target(1), 7);
        assert_eq!(tiebreak_target(2), 10);
        assert!(tiebreak_won(7, 5, 7));
        assert!(!tiebreak_won(7, 6, 7));
        assert!(tiebreak_won(11, 9, 10));
        assert!(!tiebreak_won(9, 7, 10));
    }

    #[test]
    fn set_requires_six_games_and_a_margin() {
        assert!(!set_won(5, 0));
        assert!(set_won(6, 4));
        assert!(!set_won(6, 5));
        assert!(set_won(7, 5));
        assert!(set_won(8, 6));
    }

    #[test]
    fn point_labels_below_deuce() {
        assert_eq!(point_label(0, 0, true), "0-0");
        assert_eq!(point_label(1, 0, true), "15-0");
        assert_eq!(point_label(2, 3, true), "30-40");
        assert_eq!(point_label(3, 3, true), "Deuce");
        assert_eq!(point_label(4, 4, false), "Deuce");
    }

    #[test]
    fn advantage_is_relative_to_server() {
        // Team A serving and ahead: advantage in.
        assert_eq!(point_label(4, 3, true), "Ad-In");
        // Team A serving and behind: advantage out.
        assert_eq!(point_label(3, 4, true), "Ad-Out");
        // Team B serving and ahead: advantage in.
        assert_eq!(point_label(3, 4, false), "Ad-In");
        assert_eq!(point_label(5, 4, false), "Ad-Out");
    }
}
