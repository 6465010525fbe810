//! Axum router construction for the HTTP front.
//!
//! Assembles the routes and the middleware stack: permissive CORS for
//! cross-origin dashboards, no-store response headers so intermediaries
//! never cache a stale board (the freshness window belongs to the internal
//! snapshot cache, not to HTTP caches), and request tracing.

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, header};
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use linkboard_upstream::TransitSource;

use crate::handlers;
use crate::state::AppState;

/// Build the complete router.
///
/// - `GET /routes` -- the aggregated board
/// - `OPTIONS /routes` -- CORS preflight, `200` with no body
/// - other methods on `/routes` -- `405`
/// - unknown paths -- JSON `404`
pub fn build_router<S>(state: Arc<AppState<S>>) -> Router
where
    S: TransitSource + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/routes",
            get(handlers::get_routes::<S>).options(handlers::preflight),
        )
        .fallback(handlers::not_found)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate, proxy-revalidate"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::EXPIRES,
            HeaderValue::from_static("0"),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
