//! Session lifecycle and event-delivery HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/sessions               - Create a session
//! - GET    /api/v1/sessions/{id}          - Full snapshot (counter + transcript)
//! - GET    /api/v1/sessions/{id}/messages - Transcript only
//! - POST   /api/v1/sessions/{id}/events   - Deliver one event, returns the patch
//! - DELETE /api/v1/sessions/{id}          - Destroy a session

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use vitrine_types::chat::ChatTurn;
use vitrine_types::event::SessionEvent;
use vitrine_types::session::{Session, SessionPatch};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

/// POST /api/v1/sessions - Create a session and return its initial snapshot.
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Session>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session = state.registry.create();

    Ok(Json(ApiResponse::success(
        session,
        request_id,
        start.elapsed().as_millis() as u64,
    )))
}

/// GET /api/v1/sessions/{id} - Current snapshot of a session.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Session>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session_id = parse_uuid(&id)?;
    let session = state.registry.snapshot(&session_id).await?;

    Ok(Json(ApiResponse::success(
        session,
        request_id,
        start.elapsed().as_millis() as u64,
    )))
}

/// GET /api/v1/sessions/{id}/messages - Transcript for a session.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ChatTurn>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session_id = parse_uuid(&id)?;
    let session = state.registry.snapshot(&session_id).await?;

    Ok(Json(ApiResponse::success(
        session.messages,
        request_id,
        start.elapsed().as_millis() as u64,
    )))
}

/// POST /api/v1/sessions/{id}/events - Apply one event, publish and return the patch.
pub async fn deliver_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(event): Json<SessionEvent>,
) -> Result<Json<ApiResponse<SessionPatch>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session_id = parse_uuid(&id)?;
    // The registry broadcasts the update itself; WS subscribers re-render
    // from the same diff the HTTP caller receives
    let update = state.registry.apply(&session_id, &event).await?;

    Ok(Json(ApiResponse::success(
        update.patch,
        request_id,
        start.elapsed().as_millis() as u64,
    )))
}

/// DELETE /api/v1/sessions/{id} - Destroy a session explicitly.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session_id = parse_uuid(&id)?;
    state.registry.remove(&session_id)?;

    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": true }),
        request_id,
        start.elapsed().as_millis() as u64,
    )))
}
