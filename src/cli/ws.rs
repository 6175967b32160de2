// WebSocket Module
// Keep-alive channel for admin panel clients. Each connection is registered,
// pinged at a fixed interval, and removed from the registry on close or
// error. Malformed payloads are logged and ignored.

use super::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

/// Ping cadence for connected clients
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Registry of currently connected WebSocket clients
#[derive(Debug, Default)]
pub struct WsRegistry {
    clients: Mutex<HashSet<Uuid>>,
}

impl WsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, id: Uuid) {
        if let Ok(mut clients) = self.clients.lock() {
            clients.insert(id);
        }
    }

    pub fn remove(&self, id: Uuid) {
        if let Ok(mut clients) = self.clients.lock() {
            clients.remove(&id);
        }
    }

    pub fn count(&self) -> usize {
        self.clients.lock().map(|clients| clients.len()).unwrap_or(0)
    }
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let client_id = Uuid::new_v4();
    state.ws_clients.add(client_id);
    tracing::info!(%client_id, "WebSocket client connected");

    let (mut sender, mut receiver) = socket.split();
    let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
    // The first tick completes immediately; consume it so pings start one
    // interval after connect.
    heartbeat.tick().await;

    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                if sender.send(Message::Ping(Vec::new().into())).await.is_err() {
                    break;
                }
            }

            ws_msg = receiver.next() => {
                match ws_msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<serde_json::Value>(&text) {
                            Ok(payload) => {
                                tracing::debug!(%client_id, %payload, "WebSocket message");
                            }
                            Err(error) => {
                                tracing::warn!(%client_id, %error, "Ignoring malformed WebSocket payload");
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) => break,
                    Some(Ok(_)) => {}
                    Some(Err(error)) => {
                        tracing::debug!(%client_id, %error, "WebSocket error");
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    state.ws_clients.remove(client_id);
    tracing::info!(%client_id, "WebSocket client disconnected");
}
