//! WebSocket server and connection handling.

use crate::config::ServerConfig;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::session::HelperSession;
use crate::store::{SnapshotStore, StoreError};
use dashmap::DashMap;
use dorf_core::Board;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Server state shared across all connections.
pub struct ServerState {
    pub config: ServerConfig,
    pub store: SnapshotStore,
    /// One session per connection
    pub sessions: DashMap<Uuid, HelperSession>,
    /// Mapping from session ID to its message sender
    pub senders: DashMap<Uuid, mpsc::UnboundedSender<ServerMessage>>,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            store: SnapshotStore::new(config.save_dir.clone()),
            config,
            sessions: DashMap::new(),
            senders: DashMap::new(),
        }
    }

    /// Send a message to a specific session.
    pub fn send_to(&self, session_id: Uuid, msg: ServerMessage) {
        if let Some(sender) = self.senders.get(&session_id) {
            let _ = sender.send(msg);
        }
    }

    /// Open a session for a new connection, starting from the configured snapshot if it loads.
    pub async fn open_session(&self, session_id: Uuid) -> anyhow::Result<()> {
        let mut session = HelperSession::new(session_id, self.config.board)?;
        if let Some(name) = self.config.load_on_start.clone() {
            let config = self.config.board;
            match self.with_store(move |store| store.load(&name, config)).await {
                Ok(board) => session.replace_board(board),
                Err(message) => warn!("Session {} starting fresh: {}", session_id, message),
            }
        }
        self.sessions.insert(session_id, session);
        Ok(())
    }

    /// Run a snapshot store call on the blocking pool.
    async fn with_store<T, F>(&self, f: F) -> Result<T, String>
    where
        F: FnOnce(&SnapshotStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        match tokio::task::spawn_blocking(move || f(&store)).await {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(e) => Err(format!("Snapshot task failed: {}", e)),
        }
    }
}

fn session_not_found() -> ServerMessage {
    ServerMessage::Error {
        message: "Session not found".to_string(),
    }
}

/// Run the WebSocket server.
pub async fn run_server(state: Arc<ServerState>) -> anyhow::Result<()> {
    let addr = state.config.addr;
    let listener = TcpListener::bind(addr).await?;
    info!("Dorf helper listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let session_id = Uuid::new_v4();
    state.open_session(session_id).await?;

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    state.senders.insert(session_id, tx);

    let welcome = ServerMessage::Welcome { session_id };
    let msg_text = serde_json::to_string(&welcome)?;
    ws_sender.send(Message::Text(msg_text.into())).await?;

    // Spawn task to forward messages from channel to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(text) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    handle_message(session_id, ClientMessage::GetBoard, &state).await;

    // Handle incoming messages
    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => handle_message(session_id, client_msg, &state).await,
                Err(e) => {
                    warn!("Invalid message from {}: {}", session_id, text);
                    state.send_to(
                        session_id,
                        ServerMessage::Error {
                            message: format!("Invalid message: {}", e),
                        },
                    );
                }
            },
            Ok(Message::Close(_)) => {
                info!("Client {} closing connection", session_id);
                break;
            }
            Ok(Message::Ping(_)) => {
                state.send_to(session_id, ServerMessage::Pong);
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", session_id, e);
                break;
            }
            _ => {}
        }
    }

    // Clean up on disconnect
    let placed = state
        .sessions
        .remove(&session_id)
        .map(|(_, session)| session.board().stats().tiles_placed)
        .unwrap_or(0);
    state.senders.remove(&session_id);
    send_task.abort();

    info!("Connection closed for {} after {} tiles", session_id, placed);
    Ok(())
}

/// Handle a client message.
///
/// The session's map entry stays locked while the board mutates, so a board
/// never sees two placements at once. Snapshot file I/O runs without the lock.
async fn handle_message(session_id: Uuid, msg: ClientMessage, state: &Arc<ServerState>) {
    let replies = match msg {
        ClientMessage::SaveBoard { name } => save_board(session_id, name, state).await,
        ClientMessage::LoadBoard { name } => load_board(session_id, name, state).await,
        msg => match state.sessions.get_mut(&session_id) {
            Some(mut session) => session.respond(msg),
            None => vec![session_not_found()],
        },
    };

    for reply in replies {
        if let ServerMessage::Error { message } = &reply {
            warn!("Session {}: {}", session_id, message);
        }
        state.send_to(session_id, reply);
    }
}

async fn save_board(session_id: Uuid, name: String, state: &Arc<ServerState>) -> Vec<ServerMessage> {
    let board: Option<Board> = state.sessions.get(&session_id).map(|s| s.board().clone());
    let Some(board) = board else {
        return vec![session_not_found()];
    };

    let file_name = name.clone();
    match state.with_store(move |store| store.save(&file_name, &board)).await {
        Ok(()) => vec![ServerMessage::Saved { name }],
        Err(message) => vec![ServerMessage::Error { message }],
    }
}

async fn load_board(session_id: Uuid, name: String, state: &Arc<ServerState>) -> Vec<ServerMessage> {
    let config = state.config.board;
    let board = match state.with_store(move |store| store.load(&name, config)).await {
        Ok(board) => board,
        Err(message) => return vec![ServerMessage::Error { message }],
    };

    match state.sessions.get_mut(&session_id) {
        Some(mut session) => {
            session.replace_board(board);
            vec![session.board_state()]
        }
        None => vec![session_not_found()],
    }
}
