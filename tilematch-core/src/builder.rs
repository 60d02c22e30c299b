//! Tile and board construction helpers

use serde::{Deserialize, Serialize};

use crate::board::GameBoard;
use crate::error::{Result, TileMatchError};
use crate::tile::{Position, Tile, TileAppearance, TileColor, TileShape};

/// Attributes a tile is built from; only `position` is mandatory
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpec {
    pub position: Option<Position>,
    pub color: Option<TileColor>,
    pub shape: Option<TileShape>,
    pub border: Option<TileColor>,
    pub immobile: bool,
}

impl TileSpec {
    /// Validate and build the tile
    pub fn construct(&self) -> Result<Tile> {
        let position = self
            .position
            .ok_or(TileMatchError::MissingProperty("position"))?;
        let defaults = TileAppearance::default();
        let mut tile = Tile::new(
            position,
            TileAppearance {
                color: self.color.unwrap_or(defaults.color),
                shape: self.shape.unwrap_or(defaults.shape),
                border: self.border,
            },
        );
        tile.set_mobile(!self.immobile);
        Ok(tile)
    }
}

/// Chained tile construction
///
/// ```
/// use tilematch_core::{TileBuilder, TileColor};
///
/// let tile = TileBuilder::new()
///     .position(1, 3)
///     .color(TileColor::Blue)
///     .construct()
///     .unwrap();
/// assert_eq!(tile.color(), TileColor::Blue);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct TileBuilder {
    spec: TileSpec,
}

impl TileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, x: i32, y: i32) -> Self {
        self.spec.position = Some(Position::new(x, y));
        self
    }

    pub fn color(mut self, color: TileColor) -> Self {
        self.spec.color = Some(color);
        self
    }

    pub fn shape(mut self, shape: TileShape) -> Self {
        self.spec.shape = Some(shape);
        self
    }

    pub fn border(mut self, border: TileColor) -> Self {
        self.spec.border = Some(border);
        self
    }

    /// Build frozen tiles that ignore movement
    pub fn immobile(mut self) -> Self {
        self.spec.immobile = true;
        self
    }

    pub fn spec(&self) -> &TileSpec {
        &self.spec
    }

    /// Build a tile; the builder can be reused afterwards
    pub fn construct(&self) -> Result<Tile> {
        self.spec.construct()
    }

    /// Build the empty-cell sentinel at the configured position
    pub fn construct_empty(&self) -> Result<Tile> {
        let position = self
            .spec
            .position
            .ok_or(TileMatchError::MissingProperty("position"))?;
        Ok(Tile::empty(position))
    }
}

/// Board construction
pub struct BoardFactory;

impl BoardFactory {
    /// Fresh board of empty cells; `board_type` only labels the log output
    pub fn create_board(board_type: &str, width: u16, height: u16) -> GameBoard {
        tracing::info!(board_type, width, height, "creating board");
        GameBoard::new(width, height)
    }

    /// Fresh board with the given tiles placed at their declared positions
    pub fn create_board_with_tiles(
        board_type: &str,
        width: u16,
        height: u16,
        tiles: impl IntoIterator<Item = Tile>,
    ) -> Result<GameBoard> {
        let mut board = Self::create_board(board_type, width, height);
        for tile in tiles {
            board.place_tile(tile)?;
        }
        Ok(board)
    }
}
