//! Transactional tile movement
//!
//! A [`MovementRule`] only describes where a tile goes. The provided
//! [`MovementRule::move_tile`] wraps that in the shared transaction:
//! immobile tiles are ignored, blocked moves roll the tile back to its
//! origin, and successful moves stamp the origin cell with a sentinel.

use crate::board::GameBoard;
use crate::error::{Result, TileMatchError};
use crate::tile::{Position, Tile};

/// What a call to [`MovementRule::move_tile`] did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Tile relocated, origin vacated
    Moved { from: Position, to: Position },
    /// Destination was blocked; tile and board are unchanged
    Reverted { at: Position },
    /// Tile cannot move; nothing was attempted
    Immobile { at: Position },
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// Strategy that relocates a tile on a board
pub trait MovementRule {
    /// Rule-specific relocation
    ///
    /// Must update `tile`'s position and then place it on the board, in that
    /// order, with placement as the last fallible step. Exactly one tile may
    /// be placed; anything else is treated as a move that did not happen. Return
    /// `IllegalMovement` for game-specific refusals; `InvalidPosition` and
    /// `PositionOccupied` from the board are also treated as a blocked move.
    fn apply(&mut self, board: &mut GameBoard, tile: &mut Tile) -> Result<()>;

    /// Name used in log output
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Apply this rule as a transaction
    ///
    /// Errors other than blocked-move errors are contract violations and are
    /// returned after the tile position has been restored.
    fn move_tile(&mut self, board: &mut GameBoard, tile: &mut Tile) -> Result<MoveOutcome> {
        let origin = tile.position();
        if !tile.is_mobile() {
            tracing::warn!(at = %origin, "attempted to move an immobile tile");
            return Ok(MoveOutcome::Immobile { at: origin });
        }

        tracing::debug!(rule = self.name(), at = %origin, "attempting move");
        // The origin still holds the tile during apply, so a real placement adds one tile
        let occupied_before = board.occupied();
        match self.apply(board, tile) {
            Ok(()) => {
                let to = tile.position();
                let landed = to != origin
                    && board.occupied() == occupied_before + 1
                    && board.tile_at(to.x, to.y).is_ok_and(|t| !t.is_empty());
                if !landed {
                    tracing::warn!(rule = self.name(), "rule did not place the tile, reverting");
                    tile.set_position(origin);
                    return Ok(MoveOutcome::Reverted { at: origin });
                }
                board.place_tile(Tile::empty(origin))?;
                tracing::info!(from = %origin, to = %to, "tile moved");
                Ok(MoveOutcome::Moved { from: origin, to })
            }
            Err(err) if err.is_blocked_move() => {
                tracing::warn!(rule = self.name(), error = %err, "move blocked, reverting tile");
                tile.set_position(origin);
                Ok(MoveOutcome::Reverted { at: origin })
            }
            Err(err) => {
                tile.set_position(origin);
                Err(err)
            }
        }
    }

    /// [`move_tile`](MovementRule::move_tile), then run `after` whatever the outcome
    fn move_tile_then<F>(
        &mut self,
        board: &mut GameBoard,
        tile: &mut Tile,
        after: F,
    ) -> Result<MoveOutcome>
    where
        Self: Sized,
        F: FnOnce(),
    {
        let outcome = self.move_tile(board, tile);
        after();
        outcome
    }
}

/// Moves a tile by a fixed offset (one cell down for gravity, for example)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shift {
    pub dx: i32,
    pub dy: i32,
}

impl Shift {
    pub const DOWN: Shift = Shift::new(0, -1);
    pub const UP: Shift = Shift::new(0, 1);
    pub const LEFT: Shift = Shift::new(-1, 0);
    pub const RIGHT: Shift = Shift::new(1, 0);

    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

impl MovementRule for Shift {
    fn apply(&mut self, board: &mut GameBoard, tile: &mut Tile) -> Result<()> {
        let from = tile.position();
        let to = from
            .checked_offset(self.dx, self.dy)
            .ok_or(TileMatchError::InvalidPosition { x: from.x, y: from.y })?;
        tile.set_position(to);
        board.place_tile(tile.clone())
    }

    fn name(&self) -> &str {
        "shift"
    }
}
