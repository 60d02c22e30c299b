//! Error taxonomy shared by every engine component

/// Errors raised by the tile-matching engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TileMatchError {
    #[error("position ({x}, {y}) is outside the board")]
    InvalidPosition { x: i32, y: i32 },

    #[error("position ({x}, {y}) is already occupied by another tile")]
    PositionOccupied { x: i32, y: i32 },

    #[error("illegal board content: {0}")]
    IllegalContent(String),

    #[error("illegal tile movement: {0}")]
    IllegalMovement(String),

    #[error("tile requires a `{0}` property but none was given")]
    MissingProperty(&'static str),

    #[error("cannot modify a tile group that has disbanded")]
    GroupDisbanded,

    #[error("relative position ({dx}, {dy}) in the tile group is already occupied")]
    GroupSlotOccupied { dx: i32, dy: i32 },

    #[error("the game has already ended, no further loop iterations are allowed")]
    GameEnded,
}

impl TileMatchError {
    /// Whether a movement rule should absorb this error by rolling back
    ///
    /// Blocked or out-of-bounds destinations are expected outcomes of a move;
    /// everything else is a contract violation and keeps propagating.
    pub fn is_blocked_move(&self) -> bool {
        matches!(
            self,
            TileMatchError::InvalidPosition { .. }
                | TileMatchError::PositionOccupied { .. }
                | TileMatchError::IllegalMovement(_)
        )
    }
}

/// Result alias used throughout the engine
pub type Result<T, E = TileMatchError> = std::result::Result<T, E>;
