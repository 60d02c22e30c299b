//! Greedy swap finder
//!
//! Tries every swap of two neighbouring tiles and keeps the one whose
//! immediate matches are worth the most. Cascades are not looked ahead.

use tilematch_core::{scan_board, GameBoard, GameState, MatchCondition, MatchFound, Position, Scoring};

/// A swap and the points its first clear would award
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Swap {
    pub from: Position,
    pub to: Position,
    pub points: i64,
}

/// Highest-value swap that makes at least one match
///
/// Ties go to the first swap found, scanning column-major and trying the
/// right neighbour before the upper one.
pub fn best_swap(board: &GameBoard, rules: &[Box<dyn MatchCondition>]) -> Option<Swap> {
    let mut best: Option<Swap> = None;
    for tile in board {
        let from = tile.position();
        for to in [from.offset(1, 0), from.offset(0, 1)] {
            let Some(points) = swap_value(board, rules, from, to) else {
                continue;
            };
            if points > 0 && best.map_or(true, |b| points > b.points) {
                best = Some(Swap { from, to, points });
            }
        }
    }
    best
}

/// Points from the matches a swap would create, or None if it cannot be tried
fn swap_value(board: &GameBoard, rules: &[Box<dyn MatchCondition>], a: Position, b: Position) -> Option<i64> {
    let (tile_a, tile_b) = (board.tile_at(a.x, a.y).ok()?, board.tile_at(b.x, b.y).ok()?);
    if tile_a.is_empty() || tile_b.is_empty() || tile_a == tile_b {
        return None;
    }

    let mut trial = GameState::new(board.clone(), Scoring::new());
    trial.swap_at(a, b).ok()?;
    Some(matches_through(trial.board(), rules, &[a, b]).iter().map(|m| m.value).sum())
}

/// Matches on the board that include at least one of `cells`
///
/// Runs left over elsewhere on the board are not credited to a swap.
pub fn matches_through(board: &GameBoard, rules: &[Box<dyn MatchCondition>], cells: &[Position]) -> Vec<MatchFound> {
    scan_board(board, rules)
        .into_iter()
        .filter(|found| found.positions().any(|pos| cells.contains(&pos)))
        .collect()
}
