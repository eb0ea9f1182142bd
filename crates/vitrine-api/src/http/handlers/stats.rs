//! Hub statistics endpoint.
//!
//! GET /api/v1/stats - Live session count and events applied since startup.

use std::time::Instant;

use axum::Json;
use axum::extract::State;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/stats - Aggregate hub statistics.
pub async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let stats = serde_json::json!({
        "active_sessions": state.registry.len(),
        "events_applied": state.registry.events_applied(),
    });

    Ok(Json(ApiResponse::success(
        stats,
        request_id,
        start.elapsed().as_millis() as u64,
    )))
}
