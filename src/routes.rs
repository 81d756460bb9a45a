//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /`        - JSONP hit beacon (public)
//! - `GET /health`  - Health check: counting store (public)
//!
//! # Middleware
//!
//! - **Access log** - One line per request with client IP and referrer
//! - **CORS** - Permissive; the beacon is embedded cross-origin by design

use crate::api::handlers::{health_handler, hit_handler};
use crate::api::middleware::access_log::access_log_mw;
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(hit_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(middleware::from_fn(access_log_mw))
        .layer(CorsLayer::permissive())
}
