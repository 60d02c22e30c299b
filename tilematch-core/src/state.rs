//! Game state: board, score and active match rules

use serde::{Deserialize, Serialize};

use crate::board::GameBoard;
use crate::error::{Result, TileMatchError};
use crate::matching::{MatchCondition, MatchFound};
use crate::movement::{MoveOutcome, MovementRule};
use crate::scoring::Scoring;
use crate::tile::{Position, Tile};

/// Game state (owned by one loop at a time)
pub struct GameState {
    board: GameBoard,
    score: Scoring,
    /// Scanned in insertion order
    match_rules: Vec<Box<dyn MatchCondition>>,
    game_over: bool,
}

impl GameState {
    pub fn new(board: GameBoard, score: Scoring) -> Self {
        Self {
            board,
            score,
            match_rules: Vec::new(),
            game_over: false,
        }
    }

    /// Rebuild a state from a snapshot; match rules must be re-added
    pub fn from_snapshot(snapshot: GameSnapshot) -> Self {
        Self {
            board: snapshot.board,
            score: snapshot.score,
            match_rules: Vec::new(),
            game_over: snapshot.game_over,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &GameBoard {
        &self.board
    }

    /// Mutable board, for setup and for rules that place tiles directly
    pub fn board_mut(&mut self) -> &mut GameBoard {
        &mut self.board
    }

    pub fn score(&self) -> &Scoring {
        &self.score
    }

    pub fn score_mut(&mut self) -> &mut Scoring {
        &mut self.score
    }

    pub fn match_rules(&self) -> &[Box<dyn MatchCondition>] {
        &self.match_rules
    }

    pub fn gameover(&self) -> bool {
        self.game_over
    }

    /// Mark the game finished; loops refuse to run afterwards
    pub fn end_game(&mut self) {
        if !self.game_over {
            tracing::info!(points = self.score.points(), "game over");
        }
        self.game_over = true;
    }

    /// Consistent copy of board and score for views or persistence
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            score: self.score,
            game_over: self.game_over,
        }
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    pub fn add_match_condition(&mut self, condition: impl MatchCondition + 'static) {
        self.match_rules.push(Box::new(condition));
    }

    /// Move `tile` with `rule`; see [`MovementRule::move_tile`]
    pub fn move_tile(&mut self, tile: &mut Tile, rule: &mut dyn MovementRule) -> Result<MoveOutcome> {
        rule.move_tile(&mut self.board, tile)
    }

    /// Move whatever tile sits at (x, y)
    pub fn move_tile_at(&mut self, x: i32, y: i32, rule: &mut dyn MovementRule) -> Result<MoveOutcome> {
        let mut tile = self.board.tile_at(x, y)?.clone();
        self.move_tile(&mut tile, rule)
    }

    pub fn find_match(&self, x: i32, y: i32, condition: &dyn MatchCondition) -> Option<MatchFound> {
        condition.check_match(&self.board, x, y)
    }

    /// Replace every matched tile with a sentinel at its recorded position
    pub fn clear_match(&mut self, found: &MatchFound) -> Result<()> {
        for pos in found.positions() {
            self.board.place_tile(Tile::empty(pos))?;
        }
        tracing::info!(tiles = found.matching_tiles.len(), "match cleared");
        Ok(())
    }

    /// Award a match to the score, returning the points added
    pub fn adjust_score(&mut self, found: &MatchFound) -> i64 {
        self.score.award_for_match(found)
    }

    /// Exchange two tiles' cells
    ///
    /// Both cells are vacated before either tile is placed, so the swap
    /// never collides with the occupancy check.
    pub fn swap_tiles(&mut self, a: &mut Tile, b: &mut Tile) -> Result<()> {
        let (pos_a, pos_b) = (a.position(), b.position());
        if pos_a == pos_b {
            return Err(TileMatchError::IllegalMovement(format!(
                "cannot swap a cell with itself at {}",
                pos_a
            )));
        }
        for pos in [pos_a, pos_b] {
            if !self.board.contains(pos.x, pos.y) {
                return Err(TileMatchError::InvalidPosition { x: pos.x, y: pos.y });
            }
        }

        self.board.place_tile(Tile::empty(pos_a))?;
        self.board.place_tile(Tile::empty(pos_b))?;
        a.set_position(pos_b);
        b.set_position(pos_a);
        self.board.place_tile(a.clone())?;
        self.board.place_tile(b.clone())?;

        tracing::debug!(a = %pos_a, b = %pos_b, "tiles swapped");
        Ok(())
    }

    /// Swap whatever tiles sit at the two positions
    pub fn swap_at(&mut self, a: Position, b: Position) -> Result<()> {
        let mut tile_a = self.board.tile_at(a.x, a.y)?.clone();
        let mut tile_b = self.board.tile_at(b.x, b.y)?.clone();
        self.swap_tiles(&mut tile_a, &mut tile_b)
    }
}

impl std::fmt::Debug for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameState")
            .field("board", &self.board)
            .field("score", &self.score)
            .field("match_rules", &self.match_rules.len())
            .field("game_over", &self.game_over)
            .finish()
    }
}

/// Point-in-time copy of a game, handed to views and used for persistence
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: GameBoard,
    pub score: Scoring,
    pub game_over: bool,
}

impl GameSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a snapshot; board invariants are re-checked
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
