//! Tiles that move and place as one unit

use std::collections::BTreeMap;

use crate::board::GameBoard;
use crate::error::{Result, TileMatchError};
use crate::tile::Tile;

/// A center tile plus siblings at fixed offsets from it
#[derive(Clone, Debug)]
pub struct TileGroup {
    /// Offset from center -> tile; (0, 0) is the center
    tiles: BTreeMap<(i32, i32), Tile>,
    disbanded: bool,
}

impl TileGroup {
    pub fn new(center: Tile) -> Self {
        let mut tiles = BTreeMap::new();
        tiles.insert((0, 0), center);
        Self {
            tiles,
            disbanded: false,
        }
    }

    pub fn center(&self) -> &Tile {
        &self.tiles[&(0, 0)]
    }

    /// Add a sibling; its position is forced to center + (dx, dy)
    pub fn add_sibling(&mut self, mut tile: Tile, dx: i32, dy: i32) -> Result<()> {
        if self.disbanded {
            return Err(TileMatchError::GroupDisbanded);
        }
        if self.tiles.contains_key(&(dx, dy)) {
            return Err(TileMatchError::GroupSlotOccupied { dx, dy });
        }
        tile.set_position(self.center().position().offset(dx, dy));
        tracing::debug!(dx, dy, "adding sibling tile to group");
        self.tiles.insert((dx, dy), tile);
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_disbanded(&self) -> bool {
        self.disbanded
    }

    /// Forbid further changes to the group
    pub fn disband(&mut self) {
        tracing::debug!(size = self.size(), "disbanding tile group");
        self.disbanded = true;
    }

    /// Member tiles with their offsets from the center
    pub fn tiles(&self) -> impl Iterator<Item = ((i32, i32), &Tile)> + '_ {
        self.tiles.iter().map(|(&offset, tile)| (offset, tile))
    }

    /// Place every member on the board, all or nothing
    pub fn place_on(&self, board: &mut GameBoard) -> Result<()> {
        for tile in self.tiles.values() {
            let pos = tile.position();
            if !board.is_vacant(pos.x, pos.y)? {
                return Err(TileMatchError::PositionOccupied { x: pos.x, y: pos.y });
            }
        }
        for tile in self.tiles.values() {
            board.place_tile(tile.clone())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TileBuilder;
    use crate::tile::Position;

    fn group() -> TileGroup {
        TileGroup::new(TileBuilder::new().position(5, 5).construct().unwrap())
    }

    fn sibling() -> Tile {
        TileBuilder::new().position(5, 5).construct().unwrap()
    }

    #[test]
    fn test_default_group_has_size_one() {
        assert_eq!(group().size(), 1);
    }

    #[test]
    fn test_add_sibling_sets_relative_position() {
        let mut group = group();
        group.add_sibling(sibling(), 0, -1).unwrap();
        assert_eq!(group.size(), 2);
        let (_, tile) = group.tiles().find(|(offset, _)| *offset == (0, -1)).unwrap();
        assert_eq!(tile.position(), Position::new(5, 4));
    }

    #[test]
    fn test_occupied_slot_is_rejected() {
        let mut group = group();
        assert_eq!(
            group.add_sibling(sibling(), 0, 0).unwrap_err(),
            TileMatchError::GroupSlotOccupied { dx: 0, dy: 0 }
        );
        assert_eq!(group.size(), 1);
    }

    #[test]
    fn test_disbanded_group_is_frozen() {
        let mut group = group();
        group.disband();
        assert!(group.is_disbanded());
        assert_eq!(
            group.add_sibling(sibling(), 1, 1).unwrap_err(),
            TileMatchError::GroupDisbanded
        );
    }

    #[test]
    fn test_place_on_is_all_or_nothing() {
        let mut group = group();
        group.add_sibling(sibling(), 1, 0).unwrap();

        let mut board = GameBoard::new(6, 6);
        board
            .place_tile(TileBuilder::new().position(6, 5).construct().unwrap())
            .unwrap();
        assert!(group.place_on(&mut board).is_err());
        assert!(board.is_vacant(5, 5).unwrap());

        let mut clear = GameBoard::new(6, 6);
        group.place_on(&mut clear).unwrap();
        assert_eq!(clear.occupied(), 2);
    }
}
