//! In-memory counting store for development and tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{CountStore, StoreResult};

#[derive(Default)]
struct Tables {
    sets: HashMap<String, HashSet<String>>,
    hashes: HashMap<String, HashMap<String, i64>>,
}

/// A counting store that keeps everything in process memory.
///
/// Used when Redis is not configured and by the integration tests. Counts
/// are lost on restart, which is acceptable for development but not for a
/// real deployment.
///
/// The single mutex matches Redis' single-threaded command execution: every
/// operation is atomic with respect to concurrent hits.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        debug!("Using MemoryStore (counts are process-local)");
        Self::default()
    }
}

#[async_trait]
impl CountStore for MemoryStore {
    async fn set_add(&self, key: &str, member: &str) -> StoreResult<()> {
        let mut tables = self.tables.lock().unwrap();
        tables
            .sets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string());
        Ok(())
    }

    async fn set_card(&self, key: &str) -> StoreResult<i64> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.sets.get(key).map_or(0, |set| set.len() as i64))
    }

    async fn hash_incr(&self, key: &str, field: &str, delta: i64) -> StoreResult<i64> {
        let mut tables = self.tables.lock().unwrap();
        let counter = tables
            .hashes
            .entry(key.to_string())
            .or_default()
            .entry(field.to_string())
            .or_insert(0);
        *counter += delta;
        Ok(*counter)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_add_is_idempotent_for_cardinality() {
        let store = MemoryStore::new();

        store.set_add("site_uv:a", "1.1.1.1").await.unwrap();
        store.set_add("site_uv:a", "1.1.1.1").await.unwrap();
        store.set_add("site_uv:a", "2.2.2.2").await.unwrap();

        assert_eq!(store.set_card("site_uv:a").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_set_card_missing_key_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(store.set_card("nope").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_hash_incr_returns_post_increment_value() {
        let store = MemoryStore::new();

        assert_eq!(store.hash_incr("site_pv", "a", 1).await.unwrap(), 1);
        assert_eq!(store.hash_incr("site_pv", "a", 1).await.unwrap(), 2);
        assert_eq!(store.hash_incr("site_pv", "b", 1).await.unwrap(), 1);
    }
}
