//! WebSocket connection handling
//!
//! Each upgraded connection gets a fresh session id and runs one task:
//! outbound frames come from the broadcast subscription, inbound text
//! messages are decoded and fed to the engine. When the socket closes
//! (cleanly or not) the session is disconnected exactly once.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use crate::GatewayState;

/// Upgrade `GET /ws` to a WebSocket connection.
pub async fn ws_sync(
    ws: WebSocketUpgrade,
    State(state): State<Arc<GatewayState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<GatewayState>) {
    let session = state.allocate_session();
    debug!("client connected on session {}", session);

    let mut rx = state.engine().gateway().subscribe();

    loop {
        tokio::select! {
            frame = rx.recv() => {
                match frame {
                    Ok(frame) => {
                        if socket.send(Message::Text(frame.text)).await.is_err() {
                            debug!("session {} send failed, disconnecting", session);
                            break;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        // Slow client: skip ahead, the next snapshot is
                        // complete on its own.
                        debug!("session {} lagged by {} frames", session, n);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => state.dispatch(session, &text),
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("session {} closed", session);
                        break;
                    }
                    Some(Err(e)) => {
                        debug!("session {} socket error: {}", session, e);
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    state.engine().handle_disconnect(session);
}
