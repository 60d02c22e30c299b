//! Tiles and their board coordinates

use serde::{Deserialize, Serialize};

/// 1-based board coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position shifted by (dx, dy), saturating at the coordinate limits
    pub const fn offset(&self, dx: i32, dy: i32) -> Position {
        Position::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Position shifted by (dx, dy), or None if a coordinate overflows
    pub fn checked_offset(&self, dx: i32, dy: i32) -> Option<Position> {
        Some(Position::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    /// Whether the two positions share an edge
    pub fn is_adjacent(&self, other: Position) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position::new(x, y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Default tile palette
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Indigo,
    Violet,
    /// Neutral color carried by empty cells
    LightGray,
}

impl TileColor {
    /// Colors available to real tiles, in palette order
    pub const PALETTE: [TileColor; 7] = [
        TileColor::Red,
        TileColor::Orange,
        TileColor::Yellow,
        TileColor::Green,
        TileColor::Blue,
        TileColor::Indigo,
        TileColor::Violet,
    ];

    pub fn hex(&self) -> &'static str {
        match self {
            TileColor::Red => "#FF0000",
            TileColor::Orange => "#FF7F00",
            TileColor::Yellow => "#FFFF00",
            TileColor::Green => "#00FF00",
            TileColor::Blue => "#0000FF",
            TileColor::Indigo => "#4B0082",
            TileColor::Violet => "#9400D3",
            TileColor::LightGray => "#D3D3D3",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileShape {
    Square,
    Diamond,
    Circular,
}

/// How a tile looks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileAppearance {
    pub color: TileColor,
    pub shape: TileShape,
    pub border: Option<TileColor>,
}

impl Default for TileAppearance {
    fn default() -> Self {
        Self {
            color: TileColor::Red,
            shape: TileShape::Square,
            border: None,
        }
    }
}

/// Concrete kind of a tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Real board content
    Piece,
    /// Sentinel marking an empty cell
    Empty,
}

/// A positioned, styled unit of board content
///
/// Equality compares kind, color and shape. Position and border are ignored,
/// so a tile still equals itself after it moves, while a sentinel never
/// equals a real tile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tile {
    position: Position,
    appearance: TileAppearance,
    kind: TileKind,
    mobile: bool,
}

impl Tile {
    /// Create a mobile tile
    pub fn new(position: Position, appearance: TileAppearance) -> Self {
        Self {
            position,
            appearance,
            kind: TileKind::Piece,
            mobile: true,
        }
    }

    /// Create the empty-cell sentinel for a position
    pub fn empty(position: Position) -> Self {
        Self {
            position,
            appearance: TileAppearance {
                color: TileColor::LightGray,
                shape: TileShape::Square,
                border: None,
            },
            kind: TileKind::Empty,
            mobile: false,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Relocate the tile. Board placement is a separate step.
    pub fn set_position(&mut self, position: impl Into<Position>) {
        let position = position.into();
        tracing::trace!(from = %self.position, to = %position, "updating tile position");
        self.position = position;
    }

    pub fn appearance(&self) -> TileAppearance {
        self.appearance
    }

    pub fn color(&self) -> TileColor {
        self.appearance.color
    }

    pub fn shape(&self) -> TileShape {
        self.appearance.shape
    }

    pub fn border(&self) -> Option<TileColor> {
        self.appearance.border
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.kind == TileKind::Empty
    }

    pub fn is_mobile(&self) -> bool {
        self.mobile
    }

    /// Freeze or unfreeze a real tile. Sentinels stay immobile.
    pub fn set_mobile(&mut self, mobile: bool) {
        self.mobile = mobile && !self.is_empty();
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.appearance.color == other.appearance.color
            && self.appearance.shape == other.appearance.shape
    }
}

impl Eq for Tile {}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_square(x: i32, y: i32) -> Tile {
        Tile::new(Position::new(x, y), TileAppearance::default())
    }

    #[test]
    fn test_default_appearance() {
        let tile = red_square(2, 2);
        assert_eq!(tile.color(), TileColor::Red);
        assert_eq!(tile.shape(), TileShape::Square);
        assert_eq!(tile.border(), None);
        assert!(tile.is_mobile());
    }

    #[test]
    fn test_offset_at_coordinate_limits() {
        let edge = Position::new(i32::MAX, i32::MIN);
        assert_eq!(edge.checked_offset(1, 0), None);
        assert_eq!(edge.checked_offset(0, -1), None);
        assert_eq!(edge.checked_offset(-1, 1), Some(Position::new(i32::MAX - 1, i32::MIN + 1)));
        assert_eq!(edge.offset(1, -1), edge);
        assert_eq!(Position::new(2, 3).offset(-1, 1), Position::new(1, 4));
    }

    #[test]
    fn test_equality_ignores_position() {
        assert_eq!(red_square(1, 1), red_square(5, 3));
    }

    #[test]
    fn test_equality_respects_shape_and_color() {
        let diamond = Tile::new(
            Position::new(1, 1),
            TileAppearance {
                shape: TileShape::Diamond,
                ..TileAppearance::default()
            },
        );
        let blue = Tile::new(
            Position::new(1, 1),
            TileAppearance {
                color: TileColor::Blue,
                ..TileAppearance::default()
            },
        );
        assert_ne!(red_square(1, 1), diamond);
        assert_ne!(red_square(1, 1), blue);
    }

    #[test]
    fn test_sentinel_never_equals_real_tile() {
        let sentinel = Tile::empty(Position::new(1, 1));
        let lookalike = Tile::new(
            Position::new(1, 1),
            TileAppearance {
                color: TileColor::LightGray,
                ..TileAppearance::default()
            },
        );
        assert_ne!(sentinel, lookalike);
        assert_eq!(sentinel, Tile::empty(Position::new(3, 3)));
    }

    #[test]
    fn test_sentinel_is_immobile() {
        let mut sentinel = Tile::empty(Position::new(1, 1));
        assert!(!sentinel.is_mobile());
        sentinel.set_mobile(true);
        assert!(!sentinel.is_mobile());
    }

    #[test]
    fn test_position_setter() {
        let mut tile = red_square(2, 2);
        tile.set_position((1, 3));
        assert_eq!(tile.position(), Position::new(1, 3));
    }

    #[test]
    fn test_adjacency() {
        let p = Position::new(2, 2);
        assert!(p.is_adjacent(Position::new(2, 3)));
        assert!(p.is_adjacent(Position::new(1, 2)));
        assert!(!p.is_adjacent(Position::new(3, 3)));
        assert!(!p.is_adjacent(p));
    }
}
