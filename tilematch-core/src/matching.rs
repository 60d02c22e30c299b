//! Directional match detection

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::board::GameBoard;
use crate::tile::{Position, Tile};

/// The 8 unit direction vectors a scan can follow
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanDelta {
    Up,
    Down,
    Right,
    Left,
    UpRight,
    UpLeft,
    DownRight,
    DownLeft,
}

impl ScanDelta {
    pub const ALL: [ScanDelta; 8] = [
        ScanDelta::Up,
        ScanDelta::Down,
        ScanDelta::Right,
        ScanDelta::Left,
        ScanDelta::UpRight,
        ScanDelta::UpLeft,
        ScanDelta::DownRight,
        ScanDelta::DownLeft,
    ];

    /// (dx, dy) step
    pub const fn vector(&self) -> (i32, i32) {
        match self {
            ScanDelta::Up => (0, 1),
            ScanDelta::Down => (0, -1),
            ScanDelta::Right => (1, 0),
            ScanDelta::Left => (-1, 0),
            ScanDelta::UpRight => (1, 1),
            ScanDelta::UpLeft => (-1, 1),
            ScanDelta::DownRight => (1, -1),
            ScanDelta::DownLeft => (-1, -1),
        }
    }
}

/// Decides whether two neighbouring tiles belong to the same run
pub type EqualityRule = fn(&Tile, &Tile) -> bool;

fn tiles_equal(a: &Tile, b: &Tile) -> bool {
    a == b
}

/// A discovered match and what it is worth
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFound {
    pub value: i64,
    /// Matched tiles as they were when found, in scan order
    pub matching_tiles: Vec<Tile>,
}

impl MatchFound {
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.matching_tiles.iter().map(Tile::position)
    }
}

/// Fixed scan configuration shared by match conditions
#[derive(Clone, Copy)]
pub struct MatchScan {
    delta: ScanDelta,
    value: i64,
    eq: EqualityRule,
}

impl std::fmt::Debug for MatchScan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchScan")
            .field("delta", &self.delta)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl MatchScan {
    /// Scan using plain tile equality
    pub fn new(delta: ScanDelta, value: i64) -> Self {
        Self {
            delta,
            value,
            eq: tiles_equal,
        }
    }

    /// Replace the equality rule
    pub fn with_equality(mut self, eq: EqualityRule) -> Self {
        self.eq = eq;
        self
    }

    pub fn delta(&self) -> ScanDelta {
        self.delta
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn matches(&self, a: &Tile, b: &Tile) -> bool {
        (self.eq)(a, b)
    }

    /// Collect the run of equal neighbours starting at (x, y)
    ///
    /// Stops at the first unequal neighbour, at `limit` tiles, or at the
    /// board edge. Leaving the board ends the run; it is not an error. A
    /// start outside the board yields an empty run.
    pub fn run(&self, board: &GameBoard, x: i32, y: i32, limit: Option<usize>) -> Vec<Tile> {
        let Ok(start) = board.tile_at(x, y) else {
            return Vec::new();
        };
        let (dx, dy) = self.delta.vector();
        let mut run = vec![start.clone()];
        let mut current = start;

        while limit.map_or(true, |limit| run.len() < limit) {
            let next_pos = current.position().offset(dx, dy);
            let Ok(next) = board.tile_at(next_pos.x, next_pos.y) else {
                tracing::debug!(at = %next_pos, "scan reached board edge");
                break;
            };
            if !self.matches(current, next) {
                break;
            }
            run.push(next.clone());
            current = next;
        }
        run
    }
}

/// Strategy that detects a match starting at a board position
pub trait MatchCondition: Send + Sync {
    /// Scan configuration for this condition
    fn scan(&self) -> &MatchScan;

    /// Look for a match starting at (start_x, start_y)
    ///
    /// Returns `None` when no run of at least two tiles is found, including
    /// when the scan runs off the board.
    fn check_match(&self, board: &GameBoard, start_x: i32, start_y: i32) -> Option<MatchFound>;

    fn point_value(&self) -> i64 {
        self.scan().value()
    }

    fn scan_delta(&self) -> ScanDelta {
        self.scan().delta()
    }
}

/// A straight run of at least `min_len` equal tiles
///
/// Runs never start on an empty cell. The whole run is reported, not just
/// its first `min_len` tiles.
#[derive(Clone, Copy, Debug)]
pub struct RunMatch {
    scan: MatchScan,
    min_len: usize,
}

impl RunMatch {
    pub fn new(delta: ScanDelta, value: i64, min_len: usize) -> Self {
        Self {
            scan: MatchScan::new(delta, value),
            min_len: min_len.max(2),
        }
    }

    pub fn with_equality(mut self, eq: EqualityRule) -> Self {
        self.scan = self.scan.with_equality(eq);
        self
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }
}

impl MatchCondition for RunMatch {
    fn scan(&self) -> &MatchScan {
        &self.scan
    }

    fn check_match(&self, board: &GameBoard, start_x: i32, start_y: i32) -> Option<MatchFound> {
        if board.tile_at(start_x, start_y).map_or(true, Tile::is_empty) {
            return None;
        }
        let run = self.scan.run(board, start_x, start_y, None);
        if run.len() < self.min_len {
            return None;
        }
        Some(MatchFound {
            value: self.scan.value(),
            matching_tiles: run,
        })
    }
}

/// Every match on the board this pass
///
/// Cells are visited column-major and, per cell, rules in insertion order.
/// A cell already covered by an earlier match of the same rule is not used
/// as a new start, so each run is reported once per rule.
pub fn scan_board(board: &GameBoard, rules: &[Box<dyn MatchCondition>]) -> Vec<MatchFound> {
    let mut covered: Vec<FxHashSet<Position>> = vec![FxHashSet::default(); rules.len()];
    let mut found = Vec::new();

    for tile in board {
        if tile.is_empty() {
            continue;
        }
        let pos = tile.position();
        for (rule, seen) in rules.iter().zip(covered.iter_mut()) {
            if seen.contains(&pos) {
                continue;
            }
            if let Some(matched) = rule.check_match(board, pos.x, pos.y) {
                seen.extend(matched.positions());
                found.push(matched);
            }
        }
    }

    tracing::debug!(matches = found.len(), "board scan complete");
    found
}
