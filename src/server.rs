//! HTTP server initialization and runtime setup.
//!
//! Handles store connection, shared state construction, and the Axum server
//! lifecycle.

use crate::application::services::CounterService;
use crate::config::Config;
use crate::domain::{CountStore, KeySpace};
use crate::infrastructure::store::{MemoryStore, RedisStore};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::FixedInterval;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - The counting store (Redis with startup retry, or the in-memory fallback)
/// - The per-hit counter service
/// - Axum HTTP server with graceful shutdown on ctrl-c
///
/// # Errors
///
/// Returns an error if:
/// - The Redis connection fails after all startup retries
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = connect_store(&config).await?;

    let counter_service = Arc::new(CounterService::new(
        store.clone(),
        KeySpace::new(&config.key_prefix),
        Duration::from_millis(config.store_timeout_ms),
    ));

    let state = AppState {
        counter_service,
        store,
        behind_proxy: config.behind_proxy,
    };

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

/// Connects the counting store.
///
/// With Redis configured, the connection is attempted three times with a
/// fixed 5 second pause before giving up. Without Redis the process-local
/// store is used; counts then reset on restart.
async fn connect_store(config: &Config) -> Result<Arc<dyn CountStore>> {
    match &config.redis_url {
        Some(redis_url) => {
            let retry = FixedInterval::from_millis(5_000).take(2);
            let store = Retry::spawn(retry, || RedisStore::connect(redis_url)).await?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("Redis not configured; counts are in-memory and lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutdown signal received");
    }
}
