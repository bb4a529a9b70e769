//! The board: status derivation, placement legality and mutation.
//!
//! A cell's [`TileStatus`] is a pure function of its own edges and the edges
//! of its six neighbors. The board caches it per cell and re-derives it for
//! exactly the cell and its neighbors whenever a tile is placed or removed.

use crate::coord::{Direction, GridCoord, NUM_EDGES};
use crate::edge::{Connection, EdgeKind};
use crate::grid::{Grid, GridSnapshot};
use crate::tile::{Tile, TileError, TileStatus};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Smallest grid whose origin cell is off the border
pub const MIN_BOARD_SIZE: usize = 4;

/// Largest grid a board may be created, loaded or grown to
pub const MAX_BOARD_SIZE: usize = 1024;

/// Default side length of a new board
const DEFAULT_STARTING_SIZE: usize = 8;

/// Default number of cells added on each side when the board grows
const DEFAULT_PAD_SIZE: usize = 2;

/// Default distance from the border that triggers growth
const DEFAULT_BORDER_THRESHOLD: usize = 1;

/// Errors raised by board operations
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum BoardError {
    #[error("Coordinate {coord} is outside the board")]
    OutOfBounds { coord: GridCoord },

    #[error("Illegal placement at {coord}")]
    IllegalPlacement { coord: GridCoord },

    #[error("Illegal removal at {coord}: cell is empty")]
    IllegalRemoval { coord: GridCoord },

    #[error("No tile to sample at {coord}")]
    EmptyCell { coord: GridCoord },

    #[error("Board size {size} is outside {}..={}", MIN_BOARD_SIZE, MAX_BOARD_SIZE)]
    InvalidSize { size: usize },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error(transparent)]
    Tile(#[from] TileError),

    #[error("Persistence failed: {0}")]
    Persistence(String),
}

/// Sizing policy for a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Side length of a freshly created board
    pub starting_size: usize,
    /// Cells added on every side when the board grows
    pub pad_size: usize,
    /// Placements this close to the border grow the board first
    pub border_threshold: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            starting_size: DEFAULT_STARTING_SIZE,
            pad_size: DEFAULT_PAD_SIZE,
            border_threshold: DEFAULT_BORDER_THRESHOLD,
        }
    }
}

/// A tile orientation at a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub coord: GridCoord,
    pub tile: Tile,
}

/// Result of a successful [`Board::place_tile`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementOutcome {
    /// Where the tile ended up, in the frame after any growth
    pub coord: GridCoord,
    /// Status the placed tile derived
    pub status: TileStatus,
    /// Cells added on each side if the board grew, otherwise 0
    pub grown_by: usize,
}

impl PlacementOutcome {
    pub fn enlarged(&self) -> bool {
        self.grown_by > 0
    }
}

/// Per-status counts for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BoardStats {
    /// Occupied cells, not counting the origin tile
    pub tiles_placed: usize,
    pub perfect: usize,
    pub good: usize,
    pub bad: usize,
    /// Legal placement targets
    pub valid: usize,
}

/// The hex board with derived statuses
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    grid: Grid,
    config: BoardConfig,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// A default-sized board holding only the origin tile
    pub fn new() -> Self {
        Self::build(BoardConfig::default())
    }

    /// A board of `size` x `size` cells holding only the origin tile
    pub fn with_size(size: usize) -> Result<Self, BoardError> {
        Self::with_config(BoardConfig {
            starting_size: size,
            ..BoardConfig::default()
        })
    }

    pub fn with_config(config: BoardConfig) -> Result<Self, BoardError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&config.starting_size) {
            return Err(BoardError::InvalidSize {
                size: config.starting_size,
            });
        }
        Ok(Self::build(config))
    }

    fn build(config: BoardConfig) -> Self {
        let mut board = Self {
            grid: Grid::new(config.starting_size),
            config,
        };
        let origin = board.origin();
        board.grid[origin].tile = Tile::ORIGIN;
        board.update_neighborhood(origin);
        board
    }

    /// Where the origin tile sits on a board of the current size
    fn origin(&self) -> GridCoord {
        let center = (self.grid.size() / 2) as i32 - 1;
        GridCoord::new(center, center)
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn is_in_bounds(&self, coord: GridCoord) -> bool {
        self.grid.is_in_bounds(coord)
    }

    pub fn get_tile(&self, coord: GridCoord) -> Result<Tile, BoardError> {
        self.grid.get_tile(coord)
    }

    pub fn get_status(&self, coord: GridCoord) -> Result<TileStatus, BoardError> {
        self.grid.get_status(coord)
    }

    // ==================== Connections ====================

    /// The connection `tile` would make at `coord` towards `direction`.
    ///
    /// `None` when the neighbor lies outside the grid.
    pub fn connection_towards(&self, coord: GridCoord, direction: Direction, tile: &Tile) -> Option<Connection> {
        let neighbor = self.grid.neighbor_tile(coord, direction)?;
        let own = tile.edges()[direction.index()];
        let facing = neighbor.edges()[direction.opposite().index()];
        Some(Connection::new(own, facing))
    }

    /// Legal against the void, otherwise delegates to the facing-edge pair
    pub fn is_legal_connection(&self, coord: GridCoord, direction: Direction, tile: &Tile) -> bool {
        self.connection_towards(coord, direction, tile)
            .map_or(true, |connection| connection.is_legal())
    }

    /// Whether every edge of `tile` at `coord` makes a legal connection
    pub fn is_legal_placement(&self, coord: GridCoord, tile: &Tile) -> bool {
        Direction::ALL
            .iter()
            .all(|&direction| self.is_legal_connection(coord, direction, tile))
    }

    /// Good and not-good connection counts for `tile` at `coord`.
    ///
    /// Neighbors that are empty or off the grid count toward neither.
    pub fn good_and_bad_connections(&self, coord: GridCoord, tile: &Tile) -> (usize, usize) {
        let mut good = 0;
        let mut bad = 0;
        for direction in Direction::ALL {
            if self.grid.is_empty_at(coord.neighbor(direction)) {
                continue;
            }
            match self.connection_towards(coord, direction, tile) {
                Some(connection) if connection.is_good() => good += 1,
                Some(_) => bad += 1,
                None => {}
            }
        }
        (good, bad)
    }

    /// A tile whose edge `i` is the edge facing `coord` from the neighbor in direction `i`.
    ///
    /// Edges towards empty or off-grid neighbors are `Empty`.
    pub fn connecting_edges(&self, coord: GridCoord) -> Result<Tile, BoardError> {
        self.grid.cell(coord)?;
        let mut edges = [EdgeKind::Empty; NUM_EDGES];
        for direction in Direction::ALL {
            if let Some(neighbor) = self.grid.neighbor_tile(coord, direction) {
                edges[direction.index()] = neighbor.edges()[direction.opposite().index()];
            }
        }
        Ok(Tile::new(edges))
    }

    // ==================== Status derivation ====================

    /// Status of `coord` as implied by its current neighborhood
    pub fn derive_status(&self, coord: GridCoord) -> Result<TileStatus, BoardError> {
        let tile = self.grid.get_tile(coord)?;
        if tile.is_empty() {
            let touches_tile = self
                .grid
                .neighbors_of(coord)
                .iter()
                .any(|&neighbor| !self.grid.is_empty_at(neighbor));
            return Ok(if touches_tile {
                TileStatus::Valid
            } else {
                TileStatus::Empty
            });
        }

        let (good, bad) = self.good_and_bad_connections(coord, &tile);
        Ok(if good == NUM_EDGES {
            TileStatus::Perfect
        } else if bad > 0 {
            TileStatus::Bad
        } else {
            TileStatus::Good
        })
    }

    fn update_status(&mut self, coord: GridCoord) {
        if let Ok(status) = self.derive_status(coord) {
            self.grid[coord].status = status;
        }
    }

    /// Re-derive `coord` and its six neighbors. Off-grid neighbors are skipped.
    fn update_neighborhood(&mut self, coord: GridCoord) {
        self.update_status(coord);
        for neighbor in self.grid.neighbors_of(coord) {
            self.update_status(neighbor);
        }
    }

    // ==================== Queries ====================

    /// Every coordinate currently holding `status`
    pub fn locations_with_status(&self, status: TileStatus) -> Vec<GridCoord> {
        self.grid.locations_with_status(status)
    }

    /// All legal placements of any orientation of `tile` on a `Valid` cell.
    ///
    /// Cells are visited row-major and orientations in the order returned by
    /// [`Tile::all_rotations`].
    pub fn legal_placements(&self, tile: &Tile) -> Vec<Placement> {
        let rotations = tile.all_rotations();
        let mut placements = Vec::new();
        for coord in self.locations_with_status(TileStatus::Valid) {
            for rotation in &rotations {
                if self.is_legal_placement(coord, rotation) {
                    placements.push(Placement {
                        coord,
                        tile: *rotation,
                    });
                }
            }
        }
        placements
    }

    /// A copy of the tile at an occupied cell
    pub fn sample_tile(&self, coord: GridCoord) -> Result<Tile, BoardError> {
        let tile = self.grid.get_tile(coord)?;
        if tile.is_empty() {
            return Err(BoardError::EmptyCell { coord });
        }
        Ok(tile)
    }

    pub fn stats(&self) -> BoardStats {
        let mut stats = BoardStats::default();
        for (_, cell) in self.grid.iter() {
            match cell.status {
                TileStatus::Perfect => stats.perfect += 1,
                TileStatus::Good => stats.good += 1,
                TileStatus::Bad => stats.bad += 1,
                TileStatus::Valid => stats.valid += 1,
                TileStatus::Empty => {}
            }
        }
        stats.tiles_placed = (stats.perfect + stats.good + stats.bad).saturating_sub(1);
        stats
    }

    // ==================== Mutation ====================

    /// Place `tile` exactly as oriented at `coord`.
    ///
    /// The target must be a `Valid` cell and every edge must connect legally.
    /// If the target is near the border the board grows first and the tile is
    /// written at the translated coordinate, which is returned in the outcome.
    /// A rejected placement leaves the board untouched.
    pub fn place_tile(&mut self, coord: GridCoord, tile: Tile) -> Result<PlacementOutcome, BoardError> {
        let status = self.grid.get_status(coord)?;
        if tile.is_empty() || status != TileStatus::Valid || !self.is_legal_placement(coord, &tile) {
            debug!(%coord, %tile, ?status, "rejected placement");
            return Err(BoardError::IllegalPlacement { coord });
        }

        let mut target = coord;
        let mut grown_by = 0;
        if self.grid.is_near_border(coord, self.config.border_threshold) {
            let size = self.grid.size() + 2 * self.config.pad_size;
            if size > MAX_BOARD_SIZE {
                return Err(BoardError::InvalidSize { size });
            }
            grown_by = self.config.pad_size;
            target = self.grid.enlarge_and_relocate(coord, grown_by);
            info!(size = self.grid.size(), "board enlarged");
        }

        self.grid.set_tile(target, tile)?;
        self.update_neighborhood(target);
        let status = self.grid.get_status(target)?;
        debug!(coord = %target, ?status, "placed tile");

        Ok(PlacementOutcome {
            coord: target,
            status,
            grown_by,
        })
    }

    /// Clear the tile at `coord` and return the cell's new status. Never shrinks the board.
    pub fn remove_tile(&mut self, coord: GridCoord) -> Result<TileStatus, BoardError> {
        if self.grid.get_tile(coord)?.is_empty() {
            debug!(%coord, "rejected removal of empty cell");
            return Err(BoardError::IllegalRemoval { coord });
        }
        self.grid.set_tile(coord, Tile::empty())?;
        self.update_neighborhood(coord);
        let status = self.grid.get_status(coord)?;
        debug!(%coord, ?status, "removed tile");
        Ok(status)
    }

    // ==================== Snapshots ====================

    /// A complete copy of every tile and status
    pub fn snapshot(&self) -> GridSnapshot {
        self.grid.snapshot()
    }

    /// Build a board from a snapshot.
    ///
    /// Every stored status must match what its neighborhood derives, so a
    /// snapshot can never produce a board that disagrees with itself.
    pub fn from_snapshot(snapshot: GridSnapshot, config: BoardConfig) -> Result<Self, BoardError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&snapshot.size) {
            return Err(BoardError::InvariantViolation(format!(
                "snapshot size {} is outside {}..={}",
                snapshot.size, MIN_BOARD_SIZE, MAX_BOARD_SIZE
            )));
        }
        let board = Self {
            grid: Grid::from_snapshot(snapshot)?,
            config,
        };
        for (coord, cell) in board.grid.iter() {
            let derived = board.derive_status(coord)?;
            if derived != cell.status {
                return Err(BoardError::InvariantViolation(format!(
                    "cell {} stores {:?} but derives {:?}",
                    coord, cell.status, derived
                )));
            }
        }
        Ok(board)
    }

    /// Replace the whole board with a snapshot. On error nothing changes.
    pub fn restore(&mut self, snapshot: GridSnapshot) -> Result<(), BoardError> {
        *self = Self::from_snapshot(snapshot, self.config)?;
        Ok(())
    }

    /// Write the snapshot as JSON to `path`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BoardError> {
        let json = serde_json::to_string(&self.snapshot())
            .map_err(|e| BoardError::Persistence(e.to_string()))?;
        fs::write(path.as_ref(), json).map_err(|e| BoardError::Persistence(e.to_string()))?;
        debug!(path = %path.as_ref().display(), "saved board");
        Ok(())
    }

    /// Read a board previously written by [`save`](Self::save)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BoardError> {
        let json = fs::read_to_string(path.as_ref()).map_err(|e| BoardError::Persistence(e.to_string()))?;
        let snapshot: GridSnapshot =
            serde_json::from_str(&json).map_err(|e| BoardError::Persistence(e.to_string()))?;
        Self::from_snapshot(snapshot, BoardConfig::default())
    }
}
