//! Score arithmetic shared by the selection and decision policies

/// Default exploration constant, roughly sqrt(2)
pub const DEFAULT_EXPLORATION_CONSTANT: f64 = 1.414;

/// Calculates the exploitation term for UCT
///
/// This is the observed win ratio of a child.
pub fn exploitation_term(wins: u64, visits: u64) -> f64 {
    win_rate(wins, visits)
}

/// Calculates the exploration term for UCT
///
/// Grows as the child is visited less relative to `total_visits`.
pub fn exploration_term(total_visits: u64, child_visits: u64, exploration_constant: f64) -> f64 {
    if child_visits == 0 {
        return f64::INFINITY;
    }

    exploration_constant * ((total_visits as f64).ln() / child_visits as f64).sqrt()
}

/// Calculates the UCT score of a child
///
/// `wins / visits + C * sqrt(ln(total_visits) / visits)`. Unvisited
/// children score infinity, although the tree policy never scores them.
pub fn uct_value(wins: u64, visits: u64, total_visits: u64, exploration_constant: f64) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }

    exploitation_term(wins, visits) + exploration_term(total_visits, visits, exploration_constant)
}

/// Safely calculates the win rate from wins and visits
///
/// Returns 0.0 if no visits have occurred.
pub fn win_rate(wins: u64, visits: u64) -> f64 {
    if visits == 0 {
        return 0.0;
    }
    wins as f64 / visits as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uct_matches_formula() {
        let expected = 0.5 + 1.414 * ((100f64).ln() / 10.0).sqrt();
        assert!((uct_value(5, 10, 100, 1.414) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_more_wins_never_lowers_score() {
        for wins in 0..10 {
            assert!(uct_value(wins + 1, 10, 50, 1.414) >= uct_value(wins, 10, 50, 1.414));
        }
    }

    #[test]
    fn test_fewer_visits_at_same_ratio_never_lowers_score() {
        // Ratio held at 1/2 while visits shrink
        let mut previous = uct_value(50, 100, 200, 1.414);
        for visits in [80u64, 40, 20, 10, 2] {
            let score = uct_value(visits / 2, visits, 200, 1.414);
            assert!(score >= previous);
            previous = score;
        }
    }

    #[test]
    fn test_win_rate_without_visits() {
        assert_eq!(win_rate(0, 0), 0.0);
        assert_eq!(win_rate(3, 4), 0.75);
    }
}
