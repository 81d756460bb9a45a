//! Redis-backed counting store.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::info;

use crate::domain::{CountStore, StoreError, StoreResult};

/// Redis implementation of the counting store.
///
/// Uses a shared `ConnectionManager` so that all concurrent hits reuse one
/// multiplexed connection instead of opening a connection per request. The
/// set and hash commands are atomic on the Redis side, which is what makes
/// concurrent hits safe without any locking here.
pub struct RedisStore {
    client: ConnectionManager,
}

impl RedisStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the URL is invalid, the
    /// connection cannot be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> StoreResult<Self> {
        info!("Connecting to Redis at {}", redis_url);

        let client = Client::open(redis_url).map_err(|e| {
            StoreError::Connection(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| StoreError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self { client: manager })
    }
}

#[async_trait]
impl CountStore for RedisStore {
    async fn set_add(&self, key: &str, member: &str) -> StoreResult<()> {
        let mut conn = self.client.clone();

        conn.sadd::<_, _, ()>(key, member)
            .await
            .map_err(|e| StoreError::Operation(format!("SADD {}: {}", key, e)))
    }

    async fn set_card(&self, key: &str) -> StoreResult<i64> {
        let mut conn = self.client.clone();

        conn.scard::<_, i64>(key)
            .await
            .map_err(|e| StoreError::Operation(format!("SCARD {}: {}", key, e)))
    }

    async fn hash_incr(&self, key: &str, field: &str, delta: i64) -> StoreResult<i64> {
        let mut conn = self.client.clone();

        conn.hincr::<_, _, _, i64>(key, field, delta)
            .await
            .map_err(|e| StoreError::Operation(format!("HINCRBY {} {}: {}", key, field, e)))
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
