//! Router assembly for the geonear HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with CORS
//! and tracing middleware layers.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// CORS is permissive (the map frontend may be served from any origin).
/// TraceLayer provides request-level logging via tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/programs/types",
            get(handlers::programs::list_types).post(handlers::programs::create_type),
        )
        .route(
            "/api/programs/search",
            get(handlers::programs::search_programs),
        )
        .route("/api/programs/add", post(handlers::programs::add_program))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
