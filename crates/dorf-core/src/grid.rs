//! Growable square storage for tiles and their cached statuses.
//!
//! The grid knows nothing about connection rules. It owns the cells, answers
//! bounds and topology questions, and pads itself symmetrically when asked to
//! grow. Status re-derivation lives in [`Board`](crate::board::Board).

use crate::board::{BoardError, MAX_BOARD_SIZE};
use crate::coord::{Direction, GridCoord, NUM_EDGES};
use crate::tile::{Tile, TileStatus};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One cell of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Cell {
    pub tile: Tile,
    pub status: TileStatus,
}

/// Complete, self-describing copy of a grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    /// Side length of the square grid
    pub size: usize,
    /// Cells in row-major order (`x` outer, `y` inner)
    pub cells: Vec<Cell>,
}

/// Square array of cells addressed by [`GridCoord`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// An all-empty grid of `size` x `size` cells. Callers bound `size` first.
    pub(crate) fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::default(); size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn offset_of(&self, coord: GridCoord) -> Option<usize> {
        if !self.is_in_bounds(coord) {
            return None;
        }
        Some(coord.x as usize * self.size + coord.y as usize)
    }

    fn coord_at(&self, index: usize) -> GridCoord {
        GridCoord::new((index / self.size) as i32, (index % self.size) as i32)
    }

    pub fn is_in_bounds(&self, coord: GridCoord) -> bool {
        let size = self.size as i32;
        coord.x >= 0 && coord.y >= 0 && coord.x < size && coord.y < size
    }

    /// Whether `coord` lies on the outermost ring of cells
    pub fn is_on_border(&self, coord: GridCoord) -> bool {
        self.is_near_border(coord, 0)
    }

    /// Whether `coord` is within `distance` cells of the border.
    ///
    /// Coordinates outside the grid are not "near" it.
    pub fn is_near_border(&self, coord: GridCoord, distance: usize) -> bool {
        if !self.is_in_bounds(coord) {
            return false;
        }
        let distance = distance as i32;
        let last = self.size as i32 - 1;
        coord.x <= distance
            || coord.y <= distance
            || coord.x >= last - distance
            || coord.y >= last - distance
    }

    /// The six neighbor coordinates in edge-index order
    pub fn neighbors_of(&self, coord: GridCoord) -> [GridCoord; NUM_EDGES] {
        coord.neighbors()
    }

    pub fn cell(&self, coord: GridCoord) -> Result<&Cell, BoardError> {
        self.offset_of(coord)
            .map(|i| &self.cells[i])
            .ok_or(BoardError::OutOfBounds { coord })
    }

    pub(crate) fn cell_mut(&mut self, coord: GridCoord) -> Result<&mut Cell, BoardError> {
        match self.offset_of(coord) {
            Some(i) => Ok(&mut self.cells[i]),
            None => Err(BoardError::OutOfBounds { coord }),
        }
    }

    /// The tile at `coord`. Never grows the grid.
    pub fn get_tile(&self, coord: GridCoord) -> Result<Tile, BoardError> {
        self.cell(coord).map(|cell| cell.tile)
    }

    pub fn get_status(&self, coord: GridCoord) -> Result<TileStatus, BoardError> {
        self.cell(coord).map(|cell| cell.status)
    }

    /// Whether `coord` holds no tile. Off-grid cells count as empty.
    pub fn is_empty_at(&self, coord: GridCoord) -> bool {
        self.cell(coord).map_or(true, |cell| cell.tile.is_empty())
    }

    /// The neighbor's tile in `direction`, or `None` if it lies outside the grid
    pub fn neighbor_tile(&self, coord: GridCoord, direction: Direction) -> Option<Tile> {
        self.get_tile(coord.neighbor(direction)).ok()
    }

    pub(crate) fn set_tile(&mut self, coord: GridCoord, tile: Tile) -> Result<(), BoardError> {
        self.cell_mut(coord)?.tile = tile;
        Ok(())
    }


    /// Grow by `pad` empty cells on every side, shifting existing cells by `pad`.
    ///
    /// The new storage is built completely before it replaces the old one.
    pub fn enlarge(&mut self, pad: usize) {
        if pad == 0 {
            return;
        }
        let new_size = self.size + 2 * pad;
        let mut cells = vec![Cell::default(); new_size * new_size];
        for (i, cell) in self.cells.iter().enumerate() {
            let x = i / self.size + pad;
            let y = i % self.size + pad;
            cells[x * new_size + y] = *cell;
        }
        self.cells = cells;
        self.size = new_size;
    }

    /// [`enlarge`](Self::enlarge) and return `coord` in the new frame
    pub fn enlarge_and_relocate(&mut self, coord: GridCoord, pad: usize) -> GridCoord {
        self.enlarge(pad);
        coord.translated(pad)
    }

    /// All cells with their coordinates, `x` outer and `y` inner
    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (self.coord_at(i), cell))
    }

    /// Every coordinate currently holding `status`
    pub fn locations_with_status(&self, status: TileStatus) -> Vec<GridCoord> {
        self.iter()
            .filter(|(_, cell)| cell.status == status)
            .map(|(coord, _)| coord)
            .collect()
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            size: self.size,
            cells: self.cells.clone(),
        }
    }

    /// Rebuild a grid from a snapshot, checking only its shape
    pub fn from_snapshot(snapshot: GridSnapshot) -> Result<Self, BoardError> {
        if snapshot.size > MAX_BOARD_SIZE {
            return Err(BoardError::InvariantViolation(format!(
                "snapshot size {} exceeds the maximum of {}",
                snapshot.size, MAX_BOARD_SIZE
            )));
        }
        let expected = snapshot
            .size
            .checked_mul(snapshot.size)
            .ok_or_else(|| BoardError::InvariantViolation(format!("snapshot size {} overflows", snapshot.size)))?;
        if snapshot.cells.len() != expected {
            return Err(BoardError::InvariantViolation(format!(
                "snapshot of size {} has {} cells, expected {}",
                snapshot.size,
                snapshot.cells.len(),
                expected
            )));
        }
        Ok(Self {
            size: snapshot.size,
            cells: snapshot.cells,
        })
    }
}

/// Direct cell access. Panics when `coord` is off the grid, like slice indexing.
impl Index<GridCoord> for Grid {
    type Output = Cell;

    fn index(&self, coord: GridCoord) -> &Cell {
        match self.offset_of(coord) {
            Some(i) => &self.cells[i],
            None => panic!("{} is outside a grid of size {}", coord, self.size),
        }
    }
}

impl IndexMut<GridCoord> for Grid {
    fn index_mut(&mut self, coord: GridCoord) -> &mut Cell {
        match self.offset_of(coord) {
            Some(i) => &mut self.cells[i],
            None => panic!("{} is outside a grid of size {}", coord, self.size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::EdgeKind;

    #[test]
    fn test_bounds() {
        let grid = Grid::new(8);
        assert!(grid.is_in_bounds(GridCoord::new(0, 0)));
        assert!(grid.is_in_bounds(GridCoord::new(7, 7)));
        assert!(!grid.is_in_bounds(GridCoord::new(8, 0)));
        assert!(!grid.is_in_bounds(GridCoord::new(-1, 3)));
    }

    #[test]
    fn test_near_border() {
        let grid = Grid::new(8);
        assert!(grid.is_on_border(GridCoord::new(0, 4)));
        assert!(!grid.is_on_border(GridCoord::new(1, 4)));
        assert!(grid.is_near_border(GridCoord::new(1, 4), 1));
        assert!(grid.is_near_border(GridCoord::new(4, 6), 1));
        assert!(!grid.is_near_border(GridCoord::new(3, 3), 1));
        assert!(!grid.is_near_border(GridCoord::new(9, 9), 1));
    }

    #[test]
    fn test_get_tile_out_of_bounds() {
        let grid = Grid::new(4);
        let coord = GridCoord::new(4, 1);
        assert_eq!(grid.get_tile(coord), Err(BoardError::OutOfBounds { coord }));
        assert_eq!(grid.size(), 4);
    }

    #[test]
    fn test_enlarge_preserves_cells() {
        let mut grid = Grid::new(4);
        let coord = GridCoord::new(1, 2);
        grid.set_tile(coord, Tile::uniform(EdgeKind::Crops)).unwrap();
        grid[coord].status = TileStatus::Good;

        let moved = grid.enlarge_and_relocate(coord, 2);
        assert_eq!(grid.size(), 8);
        assert_eq!(moved, GridCoord::new(3, 4));
        assert_eq!(grid.get_tile(moved), Ok(Tile::uniform(EdgeKind::Crops)));
        assert_eq!(grid.get_status(moved), Ok(TileStatus::Good));

        let occupied = grid.iter().filter(|(_, cell)| !cell.tile.is_empty()).count();
        assert_eq!(occupied, 1);
        assert_eq!(grid.locations_with_status(TileStatus::Empty).len(), 63);
    }

    #[test]
    fn test_iter_is_row_major() {
        let grid = Grid::new(3);
        let coords: Vec<_> = grid.iter().map(|(coord, _)| coord).take(4).collect();
        assert_eq!(
            coords,
            vec![
                GridCoord::new(0, 0),
                GridCoord::new(0, 1),
                GridCoord::new(0, 2),
                GridCoord::new(1, 0)
            ]
        );
    }

    #[test]
    fn test_neighbors_of_follows_edge_order() {
        let grid = Grid::new(8);
        let coord = GridCoord::new(3, 3);
        let neighbors = grid.neighbors_of(coord);
        for direction in Direction::ALL {
            assert_eq!(neighbors[direction.index()], coord.neighbor(direction));
        }
        assert_eq!(neighbors[0], GridCoord::new(2, 3));
        assert_eq!(neighbors[2], GridCoord::new(4, 2));
    }

    #[test]
    fn test_oversized_snapshot_rejected() {
        let too_big = GridSnapshot {
            size: MAX_BOARD_SIZE + 1,
            cells: Vec::new(),
        };
        assert!(matches!(
            Grid::from_snapshot(too_big),
            Err(BoardError::InvariantViolation(_))
        ));
        let overflowing = GridSnapshot {
            size: usize::MAX,
            cells: Vec::new(),
        };
        assert!(matches!(
            Grid::from_snapshot(overflowing),
            Err(BoardError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_snapshot_shape_checked() {
        let grid = Grid::new(5);
        let mut snapshot = grid.snapshot();
        assert_eq!(Grid::from_snapshot(snapshot.clone()), Ok(grid));
        snapshot.cells.pop();
        assert!(matches!(
            Grid::from_snapshot(snapshot),
            Err(BoardError::InvariantViolation(_))
        ));
    }
}
