//! Error types for the HTTP front.
//!
//! [`ApiError`] is the only error a handler can surface; its
//! [`IntoResponse`] implementation maps it onto the wire contract: a
//! `500` with a JSON `{ "error": ... }` body. Everything recoverable was
//! already absorbed further down the pipeline.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use linkboard_core::AggregateError;

/// Errors that abort a request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The aggregation pass failed outright (route listing unavailable).
    #[error("aggregation failed: {0}")]
    Aggregation(#[from] AggregateError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Aggregation(e) => {
                tracing::error!(error = %e, "request failed");
            }
        }

        let body = serde_json::json!({
            "error": "Failed to fetch route data",
        });

        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}
