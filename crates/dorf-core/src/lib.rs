//! Dorf helper - hex board engine for a tile-laying board game
//!
//! This crate tracks the board of a tile-laying hex game and recommends where
//! to place the tile a player is holding:
//! - Edge kinds and the rules for which facing edges may touch
//! - Six-edged tiles with rotation
//! - A growable square grid of cells addressed by offset coordinates
//! - Per-cell status derived from neighbor connections
//! - Placement scoring and ranked hints
//!
//! # Architecture
//!
//! The engine is synchronous and owns no global state. A caller holds a
//! [`Board`] and drives it through `place_tile`, `remove_tile` and `get_hint`;
//! rendering, input handling and file formats live outside this crate. It can
//! be compiled to native Rust for the session server or to WebAssembly for a
//! browser front end.
//!
//! # Modules
//!
//! - [`edge`]: Edge kinds and connection rules
//! - [`tile`]: Tiles and cell status
//! - [`coord`]: Grid coordinates and hex directions
//! - [`grid`]: Cell storage, growth and snapshots
//! - [`board`]: Status derivation, legality and mutation
//! - [`evaluator`]: Placement scoring and hints

pub mod board;
pub mod coord;
pub mod edge;
pub mod evaluator;
pub mod grid;
pub mod tile;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use board::{Board, BoardConfig, BoardError, BoardStats, Placement, PlacementOutcome, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
pub use coord::{Direction, GridCoord, NUM_EDGES};
pub use edge::{Connection, EdgeKind};
pub use evaluator::{Evaluation, Hint, NeighborSnapshot, PlacementEvaluator, RankedPlacement, ScoringWeights};
pub use grid::{Cell, Grid, GridSnapshot};
pub use tile::{Tile, TileError, TileStatus};
