//! WebSocket protocol messages for the board helper.

use dorf_core::{BoardStats, GridCoord, GridSnapshot, Placement, RankedPlacement, Tile, TileStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Messages sent from client to server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Replace the session board with a fresh one
    NewBoard {
        #[serde(default)]
        size: Option<usize>,
    },

    /// Replace the session board with a saved snapshot
    LoadBoard { name: String },

    /// Save the session board under a name
    SaveBoard { name: String },

    PlaceTile { coord: GridCoord, tile: Tile },

    RemoveTile { coord: GridCoord },

    /// Copy the tile at an occupied cell
    SampleTile { coord: GridCoord },

    /// The edges a tile at `coord` would have to match
    ConnectingEdges { coord: GridCoord },

    /// Rank placements for a tile
    GetHint {
        tile: Tile,
        #[serde(default)]
        top_k: Option<usize>,
        #[serde(default)]
        threshold: Option<f64>,
    },

    /// Rank placements with the default strict-then-relaxed policy
    Suggest { tile: Tile },

    /// Every legal placement for a tile, unranked
    LegalPlacements { tile: Tile },

    Stats,

    /// Request the full board
    GetBoard,

    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Welcome message with the assigned session ID
    Welcome { session_id: Uuid },

    /// Full board with the cells highlighted by the last hint
    BoardState {
        snapshot: GridSnapshot,
        hinted: Vec<GridCoord>,
    },

    /// Tile placed; `coord` is its location after any enlargement
    Placed {
        coord: GridCoord,
        status: TileStatus,
        enlarged: bool,
    },

    Removed { coord: GridCoord, status: TileStatus },

    Sampled { tile: Tile },

    /// Edge `i` is the edge facing `coord` from direction `i`, `Empty` where nothing touches
    ConnectingEdges { coord: GridCoord, edges: Tile },

    Hint { placements: Vec<RankedPlacement> },

    LegalPlacements { placements: Vec<Placement> },

    Stats { stats: BoardStats },

    Saved { name: String },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}
