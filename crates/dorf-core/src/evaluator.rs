//! Placement scoring and hint ranking.
//!
//! Every legal placement of a held tile is scored from the neighbors it would
//! touch. The score rewards good connections and tiles that become perfect,
//! and penalises bad connections and good neighbors that would turn bad:
//!
//! `score = 0.5 * perfects + good - ruined - 0.5 * bad`
//!
//! The coefficients live in [`ScoringWeights`] so callers can tune them.

use crate::board::{Board, Placement};
use crate::coord::{Direction, GridCoord, NUM_EDGES};
use crate::edge::Connection;
use crate::tile::{Tile, TileStatus};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Minimum score for the strict pass of [`Board::suggest`]
pub const SUGGEST_THRESHOLD: f64 = 2.0;

/// Result cap for the strict pass of [`Board::suggest`]
pub const SUGGEST_TOP_K: usize = 10;

/// Result cap for the relaxed pass of [`Board::suggest`]
pub const SUGGEST_FALLBACK_TOP_K: usize = 5;

/// Coefficients of the placement score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Per tile (placed or neighbor) that becomes perfect
    pub perfect: f64,
    /// Per good connection
    pub good: f64,
    /// Per good neighbor that would turn bad
    pub ruined: f64,
    /// Per not-good connection
    pub bad: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            perfect: 0.5,
            good: 1.0,
            ruined: 1.0,
            bad: 0.5,
        }
    }
}

/// State of an occupied neighbor at evaluation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborSnapshot {
    pub tile: Tile,
    pub status: TileStatus,
    /// Good connections the neighbor currently has
    pub good_connections: usize,
}

/// Sub-counts and score of one candidate placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: f64,
    pub good_connections: usize,
    pub bad_connections: usize,
    pub neighbors_perfected: usize,
    pub neighbors_ruined: usize,
    /// Perfected neighbors plus one if the placed tile itself is perfect
    pub perfects: usize,
}

/// Scores one tile orientation at one coordinate.
///
/// Built from neighbor snapshots so it never touches the board while scoring.
#[derive(Debug, Clone)]
pub struct PlacementEvaluator {
    tile: Tile,
    coord: GridCoord,
    /// Occupied neighbors in edge-index order; `None` for empty or off-grid
    neighbors: [Option<NeighborSnapshot>; NUM_EDGES],
}

impl PlacementEvaluator {
    pub fn new(tile: Tile, coord: GridCoord, neighbors: [Option<NeighborSnapshot>; NUM_EDGES]) -> Self {
        Self {
            tile,
            coord,
            neighbors,
        }
    }

    /// Snapshot the neighbors of `coord` on `board`
    pub fn from_board(board: &Board, coord: GridCoord, tile: Tile) -> Self {
        let neighbors = Direction::ALL.map(|direction| {
            let at = coord.neighbor(direction);
            let neighbor = board.get_tile(at).ok().filter(|t| !t.is_empty())?;
            let status = board.get_status(at).ok()?;
            let (good_connections, _) = board.good_and_bad_connections(at, &neighbor);
            Some(NeighborSnapshot {
                tile: neighbor,
                status,
                good_connections,
            })
        });
        Self::new(tile, coord, neighbors)
    }

    pub fn tile(&self) -> Tile {
        self.tile
    }

    pub fn coord(&self) -> GridCoord {
        self.coord
    }

    /// Occupied neighbors with the connection the tile would make to each
    fn connections(&self) -> impl Iterator<Item = (&NeighborSnapshot, Connection)> + '_ {
        Direction::ALL.iter().filter_map(move |&direction| {
            let neighbor = self.neighbors[direction.index()].as_ref()?;
            let connection = Connection::new(
                self.tile.edges()[direction.index()],
                neighbor.tile.edges()[direction.opposite().index()],
            );
            Some((neighbor, connection))
        })
    }

    pub fn evaluate(&self, weights: &ScoringWeights) -> Evaluation {
        let mut good_connections = 0;
        let mut bad_connections = 0;
        let mut neighbors_perfected = 0;
        let mut neighbors_ruined = 0;

        for (neighbor, connection) in self.connections() {
            if connection.is_good() {
                good_connections += 1;
                if neighbor.good_connections == NUM_EDGES - 1 {
                    neighbors_perfected += 1;
                }
            } else {
                bad_connections += 1;
                if neighbor.status == TileStatus::Good {
                    neighbors_ruined += 1;
                }
            }
        }

        let perfects = neighbors_perfected + usize::from(good_connections == NUM_EDGES);
        let score = weights.perfect * perfects as f64 + weights.good * good_connections as f64
            - weights.ruined * neighbors_ruined as f64
            - weights.bad * bad_connections as f64;

        Evaluation {
            score,
            good_connections,
            bad_connections,
            neighbors_perfected,
            neighbors_ruined,
            perfects,
        }
    }
}

/// A legal placement with its evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedPlacement {
    pub placement: Placement,
    pub evaluation: Evaluation,
}

impl RankedPlacement {
    pub fn coord(&self) -> GridCoord {
        self.placement.coord
    }

    pub fn score(&self) -> f64 {
        self.evaluation.score
    }
}

/// The best placements for a held tile, best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Hint {
    pub placements: Vec<RankedPlacement>,
}

impl Hint {
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Distinct coordinates to highlight, in rank order
    pub fn hinted_coords(&self) -> Vec<GridCoord> {
        let mut coords: Vec<GridCoord> = Vec::new();
        for ranked in &self.placements {
            if !coords.contains(&ranked.coord()) {
                coords.push(ranked.coord());
            }
        }
        coords
    }
}

/// Cut a ranked list down to a hint.
///
/// `ranked` must already be sorted best first, so the threshold keeps the
/// longest prefix scoring at least `threshold`.
fn truncate_ranked(
    mut ranked: Vec<RankedPlacement>,
    top_k: Option<usize>,
    threshold: Option<f64>,
) -> Vec<RankedPlacement> {
    let mut len = ranked.len();
    if let Some(threshold) = threshold {
        len = ranked
            .iter()
            .position(|r| r.score() < threshold)
            .unwrap_or(len);
    }
    if let Some(top_k) = top_k {
        len = len.min(top_k);
    }
    ranked.truncate(len);
    ranked
}

impl Board {
    /// Every legal placement of `tile`, best score first, with the default weights
    pub fn rank_all_placements(&self, tile: &Tile) -> Vec<RankedPlacement> {
        self.rank_all_placements_with(tile, &ScoringWeights::default())
    }

    /// Every legal placement of `tile`, best score first.
    ///
    /// Ties keep enumeration order from [`Board::legal_placements`].
    pub fn rank_all_placements_with(&self, tile: &Tile, weights: &ScoringWeights) -> Vec<RankedPlacement> {
        let mut ranked: Vec<RankedPlacement> = self
            .legal_placements(tile)
            .into_iter()
            .map(|placement| {
                let evaluator = PlacementEvaluator::from_board(self, placement.coord, placement.tile);
                RankedPlacement {
                    placement,
                    evaluation: evaluator.evaluate(weights),
                }
            })
            .collect();
        ranked.sort_by(|a, b| b.score().total_cmp(&a.score()));
        ranked
    }

    /// A prefix of the ranked placements.
    ///
    /// With `threshold`, stops at the first placement scoring below it. With
    /// `top_k`, keeps at most that many. With neither, returns everything.
    pub fn get_hint(&self, tile: &Tile, top_k: Option<usize>, threshold: Option<f64>) -> Hint {
        let placements = truncate_ranked(self.rank_all_placements(tile), top_k, threshold);
        debug!(%tile, count = placements.len(), ?top_k, ?threshold, "computed hint");
        Hint { placements }
    }

    /// Strict hint first, relaxed hint if the strict one is empty.
    ///
    /// Asks for up to ten placements scoring at least 2, and falls back to the
    /// five best regardless of score.
    pub fn suggest(&self, tile: &Tile) -> Hint {
        let strict = self.get_hint(tile, Some(SUGGEST_TOP_K), Some(SUGGEST_THRESHOLD));
        if !strict.is_empty() {
            return strict;
        }
        self.get_hint(tile, Some(SUGGEST_FALLBACK_TOP_K), None)
    }
}
