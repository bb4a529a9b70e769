//! Named board snapshots on disk.

use dorf_core::{Board, BoardConfig, BoardError, GridSnapshot};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid snapshot name {0:?}")]
    InvalidName(String),

    #[error("No snapshot named {0:?}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed snapshot: {0}")]
    Format(#[from] serde_json::Error),

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Directory of `<name>.json` snapshot files
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", name)))
    }

    pub fn save(&self, name: &str, board: &Board) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, serde_json::to_vec(&board.snapshot())?)?;
        info!("Saved board snapshot to {}", path.display());
        Ok(())
    }

    /// Load a snapshot. A snapshot whose statuses disagree with its tiles is rejected.
    pub fn load(&self, name: &str, config: BoardConfig) -> Result<Board, StoreError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        let snapshot: GridSnapshot = serde_json::from_slice(&fs::read(&path)?)?;
        let board = Board::from_snapshot(snapshot, config)?;
        info!("Loaded board snapshot from {}", path.display());
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dorf_core::{EdgeKind, GridCoord, Tile};

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("saves"));

        let mut board = Board::new();
        board
            .place_tile(GridCoord::new(4, 3), Tile::uniform(EdgeKind::Grass))
            .unwrap();
        store.save("manual", &board).unwrap();

        let loaded = store.load("manual", BoardConfig::default()).unwrap();
        assert_eq!(loaded.snapshot(), board.snapshot());
    }

    #[test]
    fn test_rejects_path_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        assert!(matches!(
            store.save("../escape", &Board::new()),
            Err(StoreError::InvalidName(_))
        ));
        assert!(matches!(
            store.load("", BoardConfig::default()),
            Err(StoreError::InvalidName(_))
        ));
    }

    #[test]
    fn test_missing_and_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        assert!(matches!(
            store.load("auto", BoardConfig::default()),
            Err(StoreError::NotFound(_))
        ));

        fs::write(dir.path().join("broken.json"), b"{\"size\": 8}").unwrap();
        assert!(matches!(
            store.load("broken", BoardConfig::default()),
            Err(StoreError::Format(_))
        ));
    }
}
