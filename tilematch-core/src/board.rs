//! Fixed-size grid of tiles with 1-based coordinates

use serde::{Deserialize, Serialize};

use crate::error::{Result, TileMatchError};
use crate::tile::{Position, Tile};

/// Game board (column-major grid of tiles)
///
/// Every cell always holds a tile; empty cells hold the sentinel. The tile in
/// cell `(x, y)` always reports position `(x, y)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "BoardSnapshot", try_from = "BoardSnapshot")]
pub struct GameBoard {
    width: u16,
    height: u16,
    /// Flat storage: index = (x - 1) * height + (y - 1)
    cells: Vec<Tile>,
}

impl GameBoard {
    /// Create a board filled with sentinel tiles
    pub fn new(width: u16, height: u16) -> Self {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for x in 1..=width as i32 {
            for y in 1..=height as i32 {
                cells.push(Tile::empty(Position::new(x, y)));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Check if (x, y) is on the board
    pub fn contains(&self, x: i32, y: i32) -> bool {
        1 <= x && x <= self.width as i32 && 1 <= y && y <= self.height as i32
    }

    /// Tile at (x, y)
    pub fn tile_at(&self, x: i32, y: i32) -> Result<&Tile> {
        tracing::debug!(x, y, "looking up tile");
        let index = self.index(x, y)?;
        Ok(&self.cells[index])
    }

    /// Whether (x, y) holds the sentinel
    pub fn is_vacant(&self, x: i32, y: i32) -> Result<bool> {
        Ok(self.tile_at(x, y)?.is_empty())
    }

    /// Place a tile at its own declared position
    ///
    /// Sentinels overwrite unconditionally, which is how cells are vacated.
    /// Real tiles may only land on a vacant cell.
    pub fn place_tile(&mut self, tile: Tile) -> Result<()> {
        let Position { x, y } = tile.position();
        let index = self.index(x, y)?;

        if tile.is_empty() {
            tracing::debug!(x, y, "placing sentinel, skipping occupancy check");
            self.cells[index] = tile;
            return Ok(());
        }

        if !self.cells[index].is_empty() {
            tracing::debug!(x, y, "placement rejected, cell occupied");
            return Err(TileMatchError::PositionOccupied { x, y });
        }

        tracing::debug!(x, y, color = ?tile.color(), "placing tile");
        self.cells[index] = tile;
        Ok(())
    }

    /// All tiles in column-major order (x outer, y inner)
    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.cells.iter()
    }

    /// Number of cells holding real tiles
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|tile| !tile.is_empty()).count()
    }

    fn index(&self, x: i32, y: i32) -> Result<usize> {
        if !self.contains(x, y) {
            return Err(TileMatchError::InvalidPosition { x, y });
        }
        Ok((x - 1) as usize * self.height as usize + (y - 1) as usize)
    }
}

impl<'a> IntoIterator for &'a GameBoard {
    type Item = &'a Tile;
    type IntoIter = std::slice::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Serialized form of a board
///
/// Converting back into a [`GameBoard`] re-checks the grid invariants.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub width: u16,
    pub height: u16,
    /// Column-major cells
    pub cells: Vec<Tile>,
}

impl From<GameBoard> for BoardSnapshot {
    fn from(board: GameBoard) -> Self {
        Self {
            width: board.width,
            height: board.height,
            cells: board.cells,
        }
    }
}

impl TryFrom<BoardSnapshot> for GameBoard {
    type Error = TileMatchError;

    fn try_from(snapshot: BoardSnapshot) -> Result<Self> {
        let expected = snapshot.width as usize * snapshot.height as usize;
        if snapshot.cells.len() != expected {
            return Err(TileMatchError::IllegalContent(format!(
                "expected {} cells for a {}x{} board, found {}",
                expected,
                snapshot.width,
                snapshot.height,
                snapshot.cells.len()
            )));
        }

        let height = snapshot.height.max(1) as usize;
        for (index, tile) in snapshot.cells.iter().enumerate() {
            let slot = Position::new((index / height) as i32 + 1, (index % height) as i32 + 1);
            if tile.position() != slot {
                return Err(TileMatchError::IllegalContent(format!(
                    "cell {} holds a tile declaring position {}",
                    slot,
                    tile.position()
                )));
            }
        }

        Ok(Self {
            width: snapshot.width,
            height: snapshot.height,
            cells: snapshot.cells,
        })
    }
}

impl std::fmt::Display for GameBoard {
    /// Rows from top (y = height) to bottom, one character per cell
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in (1..=self.height as i32).rev() {
            for x in 1..=self.width as i32 {
                let index = (x - 1) as usize * self.height as usize + (y - 1) as usize;
                let tile = &self.cells[index];
                let glyph = if tile.is_empty() { '.' } else { '#' };
                write!(f, "{}", glyph)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{TileAppearance, TileColor};

    fn tile(x: i32, y: i32) -> Tile {
        Tile::new(Position::new(x, y), TileAppearance::default())
    }

    #[test]
    fn test_new_board_is_all_sentinels() {
        let board = GameBoard::new(3, 4);
        assert_eq!(board.iter().count(), 12);
        assert!(board.iter().all(Tile::is_empty));
        assert_eq!(board.occupied(), 0);
        assert_eq!(board.tile_at(3, 4).unwrap().color(), TileColor::LightGray);
    }

    #[test]
    fn test_out_of_bounds_lookup() {
        let board = GameBoard::new(3, 3);
        for (x, y) in [(0, 1), (1, 0), (4, 1), (1, 4), (-1, -1)] {
            assert_eq!(
                board.tile_at(x, y).unwrap_err(),
                TileMatchError::InvalidPosition { x, y }
            );
        }
    }

    #[test]
    fn test_place_and_lookup() {
        let mut board = GameBoard::new(3, 3);
        board.place_tile(tile(2, 3)).unwrap();
        let placed = board.tile_at(2, 3).unwrap();
        assert!(!placed.is_empty());
        assert_eq!(placed.position(), Position::new(2, 3));
    }

    #[test]
    fn test_place_out_of_bounds() {
        let mut board = GameBoard::new(3, 3);
        assert_eq!(
            board.place_tile(tile(4, 1)).unwrap_err(),
            TileMatchError::InvalidPosition { x: 4, y: 1 }
        );
        assert_eq!(board.occupied(), 0);
    }

    #[test]
    fn test_place_on_occupied_cell() {
        let mut board = GameBoard::new(3, 3);
        board.place_tile(tile(1, 1)).unwrap();
        assert_eq!(
            board.place_tile(tile(1, 1)).unwrap_err(),
            TileMatchError::PositionOccupied { x: 1, y: 1 }
        );
    }

    #[test]
    fn test_sentinel_overwrites_occupied_cell() {
        let mut board = GameBoard::new(3, 3);
        board.place_tile(tile(1, 1)).unwrap();
        board.place_tile(Tile::empty(Position::new(1, 1))).unwrap();
        assert!(board.is_vacant(1, 1).unwrap());
    }

    #[test]
    fn test_iteration_is_column_major() {
        let board = GameBoard::new(2, 3);
        let order: Vec<_> = board.iter().map(Tile::position).collect();
        assert_eq!(
            order,
            vec![
                Position::new(1, 1),
                Position::new(1, 2),
                Position::new(1, 3),
                Position::new(2, 1),
                Position::new(2, 2),
                Position::new(2, 3),
            ]
        );
        // restartable
        assert_eq!((&board).into_iter().count(), 6);
    }

    #[test]
    fn test_snapshot_rejects_misplaced_tiles() {
        let mut snapshot = BoardSnapshot::from(GameBoard::new(2, 2));
        snapshot.cells[0] = tile(2, 2);
        assert!(matches!(
            GameBoard::try_from(snapshot),
            Err(TileMatchError::IllegalContent(_))
        ));
    }

    #[test]
    fn test_snapshot_rejects_wrong_cell_count() {
        let mut snapshot = BoardSnapshot::from(GameBoard::new(2, 2));
        snapshot.cells.pop();
        assert!(matches!(
            GameBoard::try_from(snapshot),
            Err(TileMatchError::IllegalContent(_))
        ));
    }

    #[test]
    fn test_json_restores_board() {
        let mut board = GameBoard::new(3, 2);
        board.place_tile(tile(3, 1)).unwrap();
        let json = serde_json::to_string(&board).unwrap();
        let restored: GameBoard = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.width(), 3);
        assert_eq!(restored.height(), 2);
        assert!(!restored.is_vacant(3, 1).unwrap());
        assert_eq!(restored.occupied(), 1);
    }

    #[test]
    fn test_display() {
        let mut board = GameBoard::new(2, 2);
        board.place_tile(tile(1, 1)).unwrap();
        assert_eq!(board.to_string(), "..\n#.\n");
    }
}
