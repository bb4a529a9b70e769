//! Hex tiles and the status a cell derives from its neighborhood.

use crate::coord::NUM_EDGES;
use crate::edge::EdgeKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from tile edge access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TileError {
    #[error("Edge index {0} out of range (0..6)")]
    InvalidIndex(usize),
}

/// A ring of six edges.
///
/// Index 0 is the left edge and indices run clockwise, matching
/// [`Direction`](crate::coord::Direction). A tile whose edges are all
/// [`EdgeKind::Empty`] stands for "no tile".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Tile {
    edges: [EdgeKind; NUM_EDGES],
}

impl Tile {
    /// The all-grass tile placed at the origin of a new board
    pub const ORIGIN: Tile = Tile::uniform(EdgeKind::Grass);

    pub const fn new(edges: [EdgeKind; NUM_EDGES]) -> Self {
        Self { edges }
    }

    /// A tile with no terrain
    pub const fn empty() -> Self {
        Self::uniform(EdgeKind::Empty)
    }

    /// A tile with the same kind on every edge
    pub const fn uniform(kind: EdgeKind) -> Self {
        Self {
            edges: [kind; NUM_EDGES],
        }
    }

    pub fn edges(&self) -> &[EdgeKind; NUM_EDGES] {
        &self.edges
    }

    pub fn get_edge(&self, index: usize) -> Result<EdgeKind, TileError> {
        self.edges
            .get(index)
            .copied()
            .ok_or(TileError::InvalidIndex(index))
    }

    pub fn set_edge(&mut self, index: usize, kind: EdgeKind) -> Result<(), TileError> {
        let edge = self
            .edges
            .get_mut(index)
            .ok_or(TileError::InvalidIndex(index))?;
        *edge = kind;
        Ok(())
    }

    /// Set every edge to `kind`
    pub fn set_all_edges(&mut self, kind: EdgeKind) {
        self.edges = [kind; NUM_EDGES];
    }

    /// Reset all edges to `Empty`
    pub fn clear(&mut self) {
        self.set_all_edges(EdgeKind::Empty);
    }

    pub fn is_empty(&self) -> bool {
        self.edges.iter().all(EdgeKind::is_empty)
    }

    /// Rotate the ring one step.
    ///
    /// Clockwise moves the edge at index `i` to index `i + 1`.
    pub fn rotate(&mut self, clockwise: bool) {
        if clockwise {
            self.edges.rotate_right(1);
        } else {
            self.edges.rotate_left(1);
        }
    }

    /// A copy rotated one step
    pub fn rotated(mut self, clockwise: bool) -> Self {
        self.rotate(clockwise);
        self
    }

    /// Every distinct orientation of this tile.
    ///
    /// Orientations are produced by shifting the ring left 0 to 5 steps;
    /// repeats caused by rotational symmetry are dropped, keeping the first
    /// occurrence. The unrotated tile is always first.
    pub fn all_rotations(&self) -> Vec<Tile> {
        let mut rotations: Vec<Tile> = Vec::with_capacity(NUM_EDGES);
        let mut current = *self;
        for _ in 0..NUM_EDGES {
            if !rotations.contains(&current) {
                rotations.push(current);
            }
            current.rotate(false);
        }
        rotations
    }
}

impl From<[EdgeKind; NUM_EDGES]> for Tile {
    fn from(edges: [EdgeKind; NUM_EDGES]) -> Self {
        Self::new(edges)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, edge) in self.edges.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", edge)?;
        }
        f.write_str("]")
    }
}

/// Status of a grid cell, always derived from its own edges and its six neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TileStatus {
    /// No tile and no occupied neighbor
    #[default]
    Empty,
    /// No tile, but at least one occupied neighbor: a placement target
    Valid,
    /// Tile whose occupied neighbors all connect well
    Good,
    /// Tile surrounded on all six sides by good connections
    Perfect,
    /// Tile with at least one occupied neighbor that does not connect well
    Bad,
}

impl TileStatus {
    /// Whether a tile sits in a cell with this status
    pub fn is_occupied(&self) -> bool {
        matches!(self, TileStatus::Good | TileStatus::Perfect | TileStatus::Bad)
    }
}
