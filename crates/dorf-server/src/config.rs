//! Server configuration read from the environment.

use dorf_core::{BoardConfig, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SAVE_DIR: &str = "saves";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid SERVER_ADDR {value:?}: {source}")]
    Addr {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("Invalid DORF_BOARD_SIZE {0:?}: expected an integer in {}..={}", MIN_BOARD_SIZE, MAX_BOARD_SIZE)]
    BoardSize(String),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to
    pub addr: SocketAddr,
    /// Directory holding named board snapshots
    pub save_dir: PathBuf,
    /// Sizing policy for new boards
    pub board: BoardConfig,
    /// Snapshot loaded into every new session instead of a fresh board
    pub load_on_start: Option<String>,
}

impl ServerConfig {
    /// Read `SERVER_ADDR`, `DORF_SAVE_DIR`, `DORF_BOARD_SIZE` and `DORF_LOAD`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr_value = lookup("SERVER_ADDR").unwrap_or_else(|| DEFAULT_ADDR.into());
        let addr = addr_value.parse().map_err(|source| ConfigError::Addr {
            value: addr_value.clone(),
            source,
        })?;

        let mut board = BoardConfig::default();
        if let Some(size) = lookup("DORF_BOARD_SIZE") {
            board.starting_size = size
                .parse::<usize>()
                .ok()
                .filter(|s| (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(s))
                .ok_or(ConfigError::BoardSize(size))?;
        }

        Ok(Self {
            addr,
            save_dir: lookup("DORF_SAVE_DIR")
                .unwrap_or_else(|| DEFAULT_SAVE_DIR.into())
                .into(),
            board,
            load_on_start: lookup("DORF_LOAD").filter(|name| !name.is_empty()),
        })
    }
}
