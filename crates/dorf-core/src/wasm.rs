//! WebAssembly bindings for the board engine.
//!
//! This module exposes the board to JavaScript through wasm-bindgen. Tiles,
//! hints and snapshots cross the boundary as JSON strings.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::board::Board;
#[cfg(feature = "wasm")]
use crate::coord::GridCoord;
#[cfg(feature = "wasm")]
use crate::grid::GridSnapshot;
#[cfg(feature = "wasm")]
use crate::tile::Tile;

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[cfg(feature = "wasm")]
fn parse_tile(tile_json: &str) -> Result<Tile, JsValue> {
    serde_json::from_str(tile_json).map_err(|e| JsValue::from_str(&format!("Invalid tile JSON: {}", e)))
}

/// WASM-exposed board wrapper
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmBoard {
    board: Board,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmBoard {
    /// Create a board of the given size holding only the origin tile
    #[wasm_bindgen(constructor)]
    pub fn new(size: usize) -> Result<WasmBoard, JsValue> {
        let board = Board::with_size(size).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmBoard { board })
    }

    /// Get the current size of the square grid
    #[wasm_bindgen(js_name = getSize)]
    pub fn get_size(&self) -> usize {
        self.board.size()
    }

    /// Get every cell (tile and status) as a JSON snapshot
    #[wasm_bindgen(js_name = getSnapshot)]
    pub fn get_snapshot(&self) -> String {
        serde_json::to_string(&self.board.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Replace the board with a JSON snapshot
    #[wasm_bindgen(js_name = restoreSnapshot)]
    pub fn restore_snapshot(&mut self, snapshot_json: &str) -> Result<(), JsValue> {
        let snapshot: GridSnapshot = serde_json::from_str(snapshot_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid snapshot JSON: {}", e)))?;
        self.board
            .restore(snapshot)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Place a tile, returns the placement outcome as JSON
    #[wasm_bindgen(js_name = placeTile)]
    pub fn place_tile(&mut self, x: i32, y: i32, tile_json: &str) -> Result<String, JsValue> {
        let tile = parse_tile(tile_json)?;
        match self.board.place_tile(GridCoord::new(x, y), tile) {
            Ok(outcome) => Ok(serde_json::to_string(&outcome).unwrap_or_else(|_| "{}".to_string())),
            Err(e) => Err(JsValue::from_str(&format!("Placement failed: {}", e))),
        }
    }

    /// Remove a tile, returns the cell's new status as JSON
    #[wasm_bindgen(js_name = removeTile)]
    pub fn remove_tile(&mut self, x: i32, y: i32) -> Result<String, JsValue> {
        match self.board.remove_tile(GridCoord::new(x, y)) {
            Ok(status) => Ok(serde_json::to_string(&status).unwrap_or_else(|_| "null".to_string())),
            Err(e) => Err(JsValue::from_str(&format!("Removal failed: {}", e))),
        }
    }

    /// Get the tile at an occupied cell as JSON
    #[wasm_bindgen(js_name = sampleTile)]
    pub fn sample_tile(&self, x: i32, y: i32) -> Result<String, JsValue> {
        let tile = self
            .board
            .sample_tile(GridCoord::new(x, y))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(serde_json::to_string(&tile).unwrap_or_else(|_| "null".to_string()))
    }

    /// Get the ranked hint for a tile as JSON. Negative `top_k` means no cap.
    #[wasm_bindgen(js_name = getHint)]
    pub fn get_hint(&self, tile_json: &str, top_k: i32, threshold: Option<f64>) -> Result<String, JsValue> {
        let tile = parse_tile(tile_json)?;
        let top_k = usize::try_from(top_k).ok();
        let hint = self.board.get_hint(&tile, top_k, threshold);
        Ok(serde_json::to_string(&hint).unwrap_or_else(|_| "{}".to_string()))
    }

    /// Get the strict-then-relaxed suggestion for a tile as JSON
    #[wasm_bindgen(js_name = suggest)]
    pub fn suggest(&self, tile_json: &str) -> Result<String, JsValue> {
        let tile = parse_tile(tile_json)?;
        Ok(serde_json::to_string(&self.board.suggest(&tile)).unwrap_or_else(|_| "{}".to_string()))
    }

    /// Get tile and status counts as JSON
    #[wasm_bindgen(js_name = getStats)]
    pub fn get_stats(&self) -> String {
        serde_json::to_string(&self.board.stats()).unwrap_or_else(|_| "{}".to_string())
    }
}
