//! Offset coordinates for the hex grid.
//!
//! Cells are addressed by `(x, y)` in a square array. Hex adjacency is encoded
//! by the fixed neighbor offsets in [`Direction`]: a cell's six neighbors are
//! `(x-1,y)`, `(x,y-1)`, `(x+1,y-1)`, `(x+1,y)`, `(x,y+1)` and `(x-1,y+1)`.
//!
//! Edge `i` of a tile faces edge `(i + 3) % 6` of the neighbor in direction `i`.
//! Every connection check in the engine relies on that relationship.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of edges on a hex tile
pub const NUM_EDGES: usize = 6;

/// Direction from a cell to one of its neighbors, indexed like tile edges.
///
/// Edge 0 is on the left and indices run clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Left, `(x-1, y)`
    West,
    /// Upper left, `(x, y-1)`
    NorthWest,
    /// Upper right, `(x+1, y-1)`
    NorthEast,
    /// Right, `(x+1, y)`
    East,
    /// Lower right, `(x, y+1)`
    SouthEast,
    /// Lower left, `(x-1, y+1)`
    SouthWest,
}

impl Direction {
    /// All directions in edge-index order
    pub const ALL: [Direction; NUM_EDGES] = [
        Direction::West,
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// Edge index this direction corresponds to
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction for an edge index, if in range
    pub fn from_index(index: usize) -> Option<Direction> {
        Self::ALL.get(index).copied()
    }

    /// The direction pointing back from the neighbor
    pub fn opposite(self) -> Direction {
        Self::ALL[(self.index() + 3) % NUM_EDGES]
    }

    /// `(dx, dy)` step to the neighbor in this direction
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::West => (-1, 0),
            Direction::NorthWest => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (0, 1),
            Direction::SouthWest => (-1, 1),
        }
    }
}

/// Position of a cell in the grid.
///
/// Coordinates are plain values. Growing the grid shifts every cell, so a
/// coordinate taken before a placement that enlarged the grid must be
/// translated with [`GridCoord::translated`] before reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbor in a specific direction (may lie outside the grid)
    pub fn neighbor(&self, direction: Direction) -> GridCoord {
        let (dx, dy) = direction.offset();
        GridCoord::new(self.x + dx, self.y + dy)
    }

    /// The six neighbors in edge-index order
    pub fn neighbors(&self) -> [GridCoord; NUM_EDGES] {
        Direction::ALL.map(|direction| self.neighbor(direction))
    }

    /// This coordinate after the grid was padded by `pad` cells on every side
    pub fn translated(&self, pad: usize) -> GridCoord {
        let pad = pad as i32;
        GridCoord::new(self.x + pad, self.y + pad)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for GridCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}
