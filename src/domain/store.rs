//! Counting-store trait and error types.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection error: {0}")]
    Connection(String),

    #[error("store operation error: {0}")]
    Operation(String),

    #[error("store operation timed out")]
    Timeout,
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Capability interface over the external counting store.
///
/// The store owns all counters and visitor sets; the service holds no
/// authoritative in-process copy. Implementations must be thread-safe and
/// provide atomic set-add and hash-increment so that concurrent hits never
/// lose updates.
///
/// # Implementations
///
/// - [`crate::infrastructure::store::RedisStore`] - Redis-backed production store
/// - [`crate::infrastructure::store::MemoryStore`] - Process-local store for
///   development and tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CountStore: Send + Sync {
    /// Adds a member to a set.
    ///
    /// Adding an existing member is a no-op for set cardinality, but the
    /// operation is still issued on every hit.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on connectivity or protocol failure.
    async fn set_add(&self, key: &str, member: &str) -> StoreResult<()>;

    /// Returns the cardinality of a set. Missing keys count as empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on connectivity or protocol failure.
    async fn set_card(&self, key: &str) -> StoreResult<i64>;

    /// Atomically increments a hash field by `delta` and returns the
    /// post-increment value. Missing keys and fields start at zero.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on connectivity or protocol failure.
    async fn hash_incr(&self, key: &str, field: &str, delta: i64) -> StoreResult<i64>;

    /// Checks if the store backend is reachable.
    ///
    /// Used by the health endpoint to report store status.
    async fn health_check(&self) -> bool;
}
