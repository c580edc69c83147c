//! WebSocket connection handling.

use crate::rooms::{AppState, Outbound};
use axum::extract::ws::{Message, WebSocket};
use chalkline_core::{BoardMessage, RelayMessage};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
enum SendError {
    #[error("encode failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("socket closed: {0}")]
    Socket(#[from] axum::Error),
}

/// What the socket loop should do after a client frame.
#[derive(Debug)]
enum Reply {
    Nothing,
    /// Switch the room subscription.
    Subscribe(broadcast::Receiver<Outbound>),
    Unsubscribe,
    /// Answer the client directly.
    Send(RelayMessage),
}

/// Per-connection room bookkeeping.
struct Peer {
    id: String,
    room: Option<String>,
    state: Arc<AppState>,
}

impl Peer {
    fn new(state: Arc<AppState>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            room: None,
            state,
        }
    }

    fn handle_text(&mut self, text: &str) -> Reply {
        let message = match RelayMessage::from_json(text) {
            Ok(message) => message,
            Err(e) => {
                warn!("Invalid message from {}: {}", self.id, e);
                return error(format!("Invalid message: {}", e));
            }
        };

        match message {
            RelayMessage::JoinRoom { room_id } => {
                self.leave();
                let rx = self.state.join(&room_id, &self.id);
                info!(
                    "Peer {} joined room {} ({} peers)",
                    self.id,
                    room_id,
                    self.state.peer_count(&room_id)
                );
                self.room = Some(room_id);
                Reply::Subscribe(rx)
            }
            RelayMessage::LeaveRoom { room_id } => {
                if self.room.as_deref() != Some(room_id.as_str()) {
                    return error(format!("Not in room {}", room_id));
                }
                self.leave();
                Reply::Unsubscribe
            }
            RelayMessage::Chat { message, room_id } => {
                if self.room.as_deref() != Some(room_id.as_str()) {
                    return error(format!("Join room {} before sending to it", room_id));
                }
                let board = match BoardMessage::from_json(&message) {
                    Ok(board) => board,
                    Err(e) => {
                        warn!("Rejected payload from {}: {}", self.id, e);
                        return error(format!("Invalid payload: {}", e));
                    }
                };
                let envelope = match board.to_envelope(&room_id) {
                    Ok(json) => json,
                    Err(e) => return error(format!("Could not encode payload: {}", e)),
                };
                self.state.record(&room_id, board);
                self.state.broadcast(&room_id, &self.id, envelope);
                Reply::Nothing
            }
            RelayMessage::Error { message } => {
                debug!("Peer {} reported: {}", self.id, message);
                Reply::Nothing
            }
            RelayMessage::Unknown => error("Unsupported message type".to_string()),
        }
    }

    fn leave(&mut self) {
        if let Some(room) = self.room.take() {
            self.state.leave(&room, &self.id);
            info!("Peer {} left room {}", self.id, room);
        }
    }
}

fn error(message: String) -> Reply {
    Reply::Send(RelayMessage::Error { message })
}

async fn send_json<S>(sender: &mut S, message: &RelayMessage) -> Result<(), SendError>
where
    S: SinkExt<Message, Error = axum::Error> + Unpin,
{
    let json = message.to_json()?;
    sender.send(Message::Text(json.into())).await?;
    Ok(())
}

/// Handle a WebSocket connection
pub async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let mut peer = Peer::new(state);
    info!("New connection: {}", peer.id);

    let (mut sender, mut receiver) = socket.split();
    let mut room_rx: Option<broadcast::Receiver<Outbound>> = None;

    loop {
        tokio::select! {
            // Handle incoming messages from client
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => match peer.handle_text(text.as_str()) {
                        Reply::Nothing => {}
                        Reply::Subscribe(rx) => room_rx = Some(rx),
                        Reply::Unsubscribe => room_rx = None,
                        Reply::Send(reply) => {
                            if let Err(e) = send_json(&mut sender, &reply).await {
                                warn!("Reply to {} failed: {}", peer.id, e);
                                break;
                            }
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => {
                        break;
                    }
                    Some(Ok(_)) => {} // Ignore binary and ping/pong
                    Some(Err(e)) => {
                        warn!("WebSocket error for {}: {}", peer.id, e);
                        break;
                    }
                }
            }

            // Handle broadcast messages from room
            msg = async {
                match &mut room_rx {
                    Some(rx) => rx.recv().await,
                    None => {
                        // No room joined, just wait forever
                        std::future::pending().await
                    }
                }
            } => {
                match msg {
                    Ok((from, json)) => {
                        // Don't echo back to sender
                        if from != peer.id && sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Peer {} lagged, {} frames dropped", peer.id, skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => room_rx = None,
                }
            }
        }
    }

    // Cleanup on disconnect
    peer.leave();
    info!("Connection closed: {}", peer.id);
}
