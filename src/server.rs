use axum::{middleware as axum_mw, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::handlers;
use crate::middleware::timing;
use crate::AppState;

/// Builds the Axum `Router` serving the stats report and its middleware.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // ── Stats report ────────────────────────────────────────
        .route("/", get(handlers::info::get_info))
        .route("/info", get(handlers::info::get_info))
        .route("/api/info", get(handlers::info::get_info))
        .with_state(state)
        // ── Global middleware (applied bottom-up) ───────────────
        .layer(axum_mw::from_fn(timing::timing_middleware))
        .layer(CorsLayer::permissive())
}
