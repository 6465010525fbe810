//! Endpoint handlers for the HTTP front.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/routes` | Aggregated light-rail board (cached) |
//! | `OPTIONS` | `/routes` | CORS preflight |
//! | any | anything else | JSON 404 |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::{debug, info};

use linkboard_types::RouteBoard;
use linkboard_upstream::TransitSource;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /routes`: the aggregated light-rail board.
///
/// Served straight from the snapshot cache while it is fresh. On a miss
/// the aggregation pipeline rebuilds the board and republishes it before
/// responding. With single-flight enabled, concurrent misses queue on the
/// refresh gate and re-check the cache instead of each recomputing;
/// without it they recompute independently and the last writer wins,
/// which is acceptable because snapshots are interchangeable.
pub async fn get_routes<S>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<RouteBoard>, ApiError>
where
    S: TransitSource + Send + Sync + 'static,
{
    if let Some(board) = state.cache.get().await {
        debug!("serving cached route data");
        return Ok(Json(board));
    }

    if let Some(gate) = &state.refresh_gate {
        let _guard = gate.lock().await;
        // Another request may have republished while we waited.
        if let Some(board) = state.cache.get().await {
            debug!("serving route data refreshed by a concurrent request");
            return Ok(Json(board));
        }
        return Ok(Json(refresh(state.as_ref()).await?));
    }

    Ok(Json(refresh(state.as_ref()).await?))
}

/// Run one aggregation pass and republish the snapshot.
async fn refresh<S>(state: &AppState<S>) -> Result<RouteBoard, ApiError>
where
    S: TransitSource + Send + Sync,
{
    info!("cache miss, fetching fresh route data");
    let board = state.aggregator.aggregate().await?;
    state.cache.put(&board).await;
    info!(routes = board.len(), "route data refreshed");
    Ok(board)
}

/// `OPTIONS /routes`: CORS preflight. The CORS layer supplies the headers;
/// the body stays empty.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Fallback for unknown paths.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "not found" })),
    )
}
