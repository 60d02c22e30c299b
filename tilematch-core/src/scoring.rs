//! Score accumulation

use serde::{Deserialize, Serialize};

use crate::matching::MatchFound;

/// Running score of a game
///
/// Neither points nor multiplier are clamped: negative match values and
/// negative multipliers subtract points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoring {
    points: i64,
    multiplier: i64,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            points: 0,
            multiplier: 1,
        }
    }
}

impl Scoring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> i64 {
        self.points
    }

    pub fn multiplier(&self) -> i64 {
        self.multiplier
    }

    /// Set the multiplier applied to future awards (0 disables awards)
    pub fn set_multiplier(&mut self, multiplier: i64) {
        tracing::debug!(from = self.multiplier, to = multiplier, "updating multiplier");
        self.multiplier = multiplier;
    }

    /// Add `multiplier * value` for a match, returning the delta
    ///
    /// Arithmetic saturates at the `i64` limits instead of overflowing.
    pub fn award_for_match(&mut self, found: &MatchFound) -> i64 {
        let delta = self.multiplier.saturating_mul(found.value);
        tracing::debug!(delta, "awarding points for match");
        let points = self.points.saturating_add(delta);
        if points == i64::MAX || points == i64::MIN {
            tracing::warn!(points, "score reached its limit");
        }
        self.points = points;
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(value: i64) -> MatchFound {
        MatchFound {
            value,
            matching_tiles: Vec::new(),
        }
    }

    #[test]
    fn test_initial_score() {
        let score = Scoring::new();
        assert_eq!(score.points(), 0);
        assert_eq!(score.multiplier(), 1);
    }

    #[test]
    fn test_award_adds_points() {
        let mut score = Scoring::new();
        assert_eq!(score.award_for_match(&found(4)), 4);
        assert_eq!(score.points(), 4);
        assert_eq!(score.multiplier(), 1);
    }

    #[test]
    fn test_constant_multiplier_accumulates() {
        let mut score = Scoring::new();
        score.set_multiplier(3);
        for value in [1, 5, 10] {
            score.award_for_match(&found(value));
        }
        assert_eq!(score.points(), 3 * 16);
    }

    #[test]
    fn test_zero_multiplier_nullifies() {
        let mut score = Scoring::new();
        score.set_multiplier(0);
        score.award_for_match(&found(100));
        assert_eq!(score.points(), 0);
    }

    #[test]
    fn test_penalties_can_go_negative() {
        let mut score = Scoring::new();
        score.award_for_match(&found(-5));
        assert_eq!(score.points(), -5);
        score.set_multiplier(-2);
        score.award_for_match(&found(5));
        assert_eq!(score.points(), -15);
    }

    #[test]
    fn test_huge_awards_saturate() {
        let mut score = Scoring::new();
        score.set_multiplier(i64::MAX);
        assert_eq!(score.award_for_match(&found(2)), i64::MAX);
        assert_eq!(score.points(), i64::MAX);
        score.award_for_match(&found(1));
        assert_eq!(score.points(), i64::MAX);

        score.set_multiplier(i64::MIN);
        score.award_for_match(&found(3));
        score.award_for_match(&found(3));
        assert_eq!(score.points(), i64::MIN);
    }
}
