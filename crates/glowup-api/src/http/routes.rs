//! HTTP route definitions.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the router.
///
/// ```text
/// /api/orders
///   POST   /                               - Place an order
///   POST   /setup-session                  - Supervised retailer login
///   GET    /session-status                 - Probe the stored session
///   GET    /{order_id}/tracking            - Tracking record for an order
///   GET    /user/{user_id}/latest-tracking - Latest record for a user
///
/// /health
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    let order_routes = Router::new()
        .route("/", post(handlers::place_order))
        .route("/setup-session", post(handlers::setup_session))
        .route("/session-status", get(handlers::session_status))
        .route("/{order_id}/tracking", get(handlers::order_tracking))
        .route("/user/{user_id}/latest-tracking", get(handlers::latest_tracking))
        .with_state(state);

    Router::new()
        .nest("/api/orders", order_routes)
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
