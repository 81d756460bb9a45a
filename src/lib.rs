//! # Hit Counter
//!
//! A lightweight JSONP analytics beacon built with Axum and Redis.
//!
//! A web page embeds a script tag pointing at this service; each request is
//! attributed to the referring page and bumps three counters in the shared
//! counting store: the site's unique-visitor set, the site's page-view
//! counter, and the page's view counter. The updated counts come back as a
//! JSONP payload for client-side display.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Hit model, key scheme, and the store trait
//! - **Application Layer** ([`application`]) - Per-hit metric aggregation
//! - **Infrastructure Layer** ([`infrastructure`]) - Redis and in-memory stores
//! - **API Layer** ([`api`]) - The beacon endpoint, health check, and middleware
//!
//! ## Features
//!
//! - Concurrent fan-out of the three metric updates per hit
//! - Per-metric degrade-on-failure: one store error never fails the response
//! - Namespaced keys so deployments can share one Redis instance
//! - In-memory store fallback for development
//!
//! ## Quick Start
//!
//! ```bash
//! # Optional; without it counts are kept in process memory
//! export REDIS_URL="redis://localhost:6379"
//!
//! # Start the service
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{CounterService, HitCounts};
    pub use crate::domain::{CountStore, Hit, KeySpace, StoreError};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
