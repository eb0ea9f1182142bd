//! WebSocket handler for one viewer's session.
//!
//! `GET /ws/sessions/{id}` upgrades to a WebSocket. Once connected, the
//! handler:
//!
//! - **Receives events:** Parses incoming text frames as [`SessionEvent`] and
//!   applies them to the session. Malformed frames are logged and ignored;
//!   rejected events (blank chat submissions) are logged and dropped.
//! - **Forwards updates:** Holds a session-scoped subscription on the
//!   registry's update bus and pushes each [`SessionUpdate`] to the client as
//!   a JSON text frame, so the client re-renders from explicit diffs in
//!   application order.
//!
//! Disconnecting does **not** destroy the session. The viewer may reconnect;
//! destruction happens on explicit DELETE or idle expiry.
//!
//! [`SessionUpdate`]: vitrine_types::session::SessionUpdate

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use uuid::Uuid;

use vitrine_types::event::SessionEvent;

use crate::http::error::AppError;
use crate::state::AppState;

/// Upgrade an HTTP request to a WebSocket connection for a session.
///
/// Rejects the upgrade with 404 when the session does not exist.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let session_id = id
        .parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {id}")))?;
    if !state.registry.contains(&session_id) {
        return Err(AppError::Session(
            vitrine_types::error::SessionError::NotFound,
        ));
    }

    Ok(ws.on_upgrade(move |socket| handle_ws_connection(socket, state, session_id)))
}

/// Core WebSocket connection handler.
///
/// Uses `tokio::select!` to multiplex between updates from the bus and
/// incoming frames from the client, keeping both directions in one task.
async fn handle_ws_connection(socket: WebSocket, state: AppState, session_id: Uuid) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let mut updates = state.registry.updates().subscribe_session(session_id);

    loop {
        tokio::select! {
            // --- Branch 1: Forward this session's updates to the client ---
            update = updates.recv() => {
                match update {
                    Some(update) => {
                        match serde_json::to_string(&update) {
                            Ok(json) => {
                                if ws_sender.send(Message::Text(json.into())).await.is_err() {
                                    // Client disconnected
                                    break;
                                }
                            }
                            Err(err) => {
                                tracing::warn!("Failed to serialize SessionUpdate: {err}");
                            }
                        }
                    }
                    None => {
                        // Bus closed (server shutting down)
                        break;
                    }
                }
            }

            // --- Branch 2: Apply events from the client ---
            msg_result = ws_receiver.next() => {
                match msg_result {
                    Some(Ok(Message::Text(text))) => {
                        process_event(&text, &state, session_id).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        // Client disconnected; the session itself survives
                        break;
                    }
                    Some(Err(err)) => {
                        tracing::debug!("WebSocket receive error: {err}");
                        break;
                    }
                    // Ignore binary, ping, pong protocol frames
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::debug!(%session_id, "WebSocket connection closed");
}

/// Parse and apply a single event frame from the client.
///
/// The registry broadcasts the resulting update itself, under the session's
/// lock, so this function only has to apply and report failures.
async fn process_event(text: &str, state: &AppState, session_id: Uuid) {
    let event: SessionEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(err) => {
            tracing::warn!(
                raw = %text,
                error = %err,
                "Ignoring malformed WebSocket event"
            );
            return;
        }
    };

    if let Err(err) = state.registry.apply(&session_id, &event).await {
        tracing::warn!(%session_id, error = %err, "Event rejected");
    }
}
