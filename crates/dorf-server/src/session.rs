//! Per-connection helper sessions.

use dorf_core::{Board, BoardConfig, BoardError, GridCoord, Hint};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::protocol::{ClientMessage, ServerMessage};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Board(#[from] BoardError),

    /// Snapshot requests do file I/O and are served by the server, off the session lock
    #[error("{0} is not handled by the session")]
    StoreRequest(&'static str),
}

/// One board and the cells highlighted by its most recent hint.
#[derive(Debug, Clone)]
pub struct HelperSession {
    pub id: Uuid,
    board: Board,
    config: BoardConfig,
    /// Cleared by any mutation, since coordinates shift when the board grows
    hinted: Vec<GridCoord>,
}

impl HelperSession {
    pub fn new(id: Uuid, config: BoardConfig) -> Result<Self, SessionError> {
        Ok(Self {
            id,
            board: Board::with_config(config)?,
            config,
            hinted: Vec::new(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn hinted(&self) -> &[GridCoord] {
        &self.hinted
    }

    pub fn board_state(&self) -> ServerMessage {
        ServerMessage::BoardState {
            snapshot: self.board.snapshot(),
            hinted: self.hinted().to_vec(),
        }
    }

    pub fn new_board(&mut self, size: Option<usize>) -> Result<(), SessionError> {
        let mut config = self.config;
        if let Some(size) = size {
            config.starting_size = size;
        }
        self.board = Board::with_config(config)?;
        self.hinted.clear();
        Ok(())
    }

    /// Swap in a board loaded elsewhere
    pub fn replace_board(&mut self, board: Board) {
        self.board = board;
        self.hinted.clear();
    }

    fn remember(&mut self, hint: Hint) -> Hint {
        self.hinted = hint.hinted_coords();
        hint
    }

    /// Apply a board request, returning the replies in send order.
    pub fn handle(&mut self, msg: ClientMessage) -> Result<Vec<ServerMessage>, SessionError> {
        let replies = match msg {
            ClientMessage::NewBoard { size } => {
                self.new_board(size)?;
                vec![self.board_state()]
            }

            ClientMessage::LoadBoard { .. } => return Err(SessionError::StoreRequest("LoadBoard")),

            ClientMessage::SaveBoard { .. } => return Err(SessionError::StoreRequest("SaveBoard")),

            ClientMessage::PlaceTile { coord, tile } => {
                let outcome = self.board.place_tile(coord, tile)?;
                self.hinted.clear();
                debug!("Session {} placed {} at {}", self.id, tile, outcome.coord);

                let mut replies = vec![ServerMessage::Placed {
                    coord: outcome.coord,
                    status: outcome.status,
                    enlarged: outcome.enlarged(),
                }];
                // every coordinate the client holds is stale after growth
                if outcome.enlarged() {
                    replies.push(self.board_state());
                }
                replies
            }

            ClientMessage::RemoveTile { coord } => {
                let status = self.board.remove_tile(coord)?;
                self.hinted.clear();
                vec![ServerMessage::Removed { coord, status }]
            }

            ClientMessage::SampleTile { coord } => {
                let tile = self.board.sample_tile(coord)?;
                vec![ServerMessage::Sampled { tile }]
            }

            ClientMessage::ConnectingEdges { coord } => vec![ServerMessage::ConnectingEdges {
                coord,
                edges: self.board.connecting_edges(coord)?,
            }],

            ClientMessage::GetHint {
                tile,
                top_k,
                threshold,
            } => {
                let hint = self.board.get_hint(&tile, top_k, threshold);
                let hint = self.remember(hint);
                vec![ServerMessage::Hint {
                    placements: hint.placements,
                }]
            }

            ClientMessage::Suggest { tile } => {
                let hint = self.board.suggest(&tile);
                let hint = self.remember(hint);
                vec![ServerMessage::Hint {
                    placements: hint.placements,
                }]
            }

            ClientMessage::LegalPlacements { tile } => vec![ServerMessage::LegalPlacements {
                placements: self.board.legal_placements(&tile),
            }],

            ClientMessage::Stats => vec![ServerMessage::Stats {
                stats: self.board.stats(),
            }],

            ClientMessage::GetBoard => vec![self.board_state()],

            ClientMessage::Ping => vec![ServerMessage::Pong],
        };
        Ok(replies)
    }

    /// Like [`handle`](Self::handle), but failures become an `Error` reply.
    pub fn respond(&mut self, msg: ClientMessage) -> Vec<ServerMessage> {
        self.handle(msg).unwrap_or_else(|e| {
            vec![ServerMessage::Error {
                message: e.to_string(),
            }]
        })
    }
}
