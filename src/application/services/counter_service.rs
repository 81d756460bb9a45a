//! Per-hit metric aggregation against the counting store.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::domain::{CountStore, Hit, KeySpace, StoreError, StoreResult};

/// The three counters reported back for one hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitCounts {
    pub site_uv: i64,
    pub site_pv: i64,
    pub page_pv: i64,
}

/// Aggregates the three metric updates of a single hit.
///
/// Each hit fans out into three concurrent store updates touching disjoint
/// keys: the per-site unique-visitor set, the per-site page-view counter and
/// the per-page page-view counter. The updates have no ordering dependency;
/// the store's own atomic set-add and hash-increment are the sole
/// correctness mechanism under concurrent hits.
///
/// # Failure Policy
///
/// Degrade, never abort: a failed or timed-out store operation reports a
/// zero sentinel for its own metric only, the sibling updates still complete
/// and the hit still produces a response. Store errors are logged and not
/// retried within a hit. This trades counting accuracy for availability.
pub struct CounterService {
    store: Arc<dyn CountStore>,
    keys: KeySpace,
    op_timeout: Duration,
}

impl CounterService {
    /// Creates a new counter service.
    ///
    /// `op_timeout` bounds every individual store operation; an elapsed
    /// timeout is treated as a failure of that one metric.
    pub fn new(store: Arc<dyn CountStore>, keys: KeySpace, op_timeout: Duration) -> Self {
        Self {
            store,
            keys,
            op_timeout,
        }
    }

    /// Applies all three metric updates for `hit` and returns the counts.
    ///
    /// The updates run as three independent tasks on the runtime. The call
    /// joins on all of them, so no update is abandoned even when a sibling
    /// has already failed. Degraded metrics are reported as `0`.
    pub async fn record_hit(&self, hit: &Hit) -> HitCounts {
        let site_uv = tokio::spawn(record_site_uv(
            self.store.clone(),
            self.op_timeout,
            self.keys.site_uv(&hit.site),
            hit.visitor.clone(),
        ));
        let site_pv = tokio::spawn(increment(
            self.store.clone(),
            self.op_timeout,
            self.keys.site_pv(),
            hit.site.clone(),
            "site_pv",
        ));
        let page_pv = tokio::spawn(increment(
            self.store.clone(),
            self.op_timeout,
            self.keys.page_pv(&hit.site),
            hit.path.clone(),
            "page_pv",
        ));

        HitCounts {
            site_uv: join_metric(site_uv, "site_uv").await,
            site_pv: join_metric(site_pv, "site_pv").await,
            page_pv: join_metric(page_pv, "page_pv").await,
        }
    }
}

/// Adds the visitor to the site's set, then reads the set cardinality.
///
/// The add is issued on every hit; set semantics make re-adding a known
/// visitor a no-op for the count. A failed add skips the read.
async fn record_site_uv(
    store: Arc<dyn CountStore>,
    limit: Duration,
    key: String,
    visitor: String,
) -> i64 {
    if let Err(e) = bounded(limit, store.set_add(&key, &visitor)).await {
        warn!(%key, error = %e, "failed to record unique visitor");
        return 0;
    }

    match bounded(limit, store.set_card(&key)).await {
        Ok(count) => count,
        Err(e) => {
            warn!(%key, error = %e, "failed to read unique-visitor count");
            0
        }
    }
}

/// Increments one page-view counter field and returns the new value.
async fn increment(
    store: Arc<dyn CountStore>,
    limit: Duration,
    key: String,
    field: String,
    metric: &'static str,
) -> i64 {
    match bounded(limit, store.hash_incr(&key, &field, 1)).await {
        Ok(count) => count,
        Err(e) => {
            warn!(%key, %field, metric, error = %e, "failed to increment page-view counter");
            0
        }
    }
}

/// Bounds a store operation by the configured timeout.
async fn bounded<T>(limit: Duration, op: impl Future<Output = StoreResult<T>>) -> StoreResult<T> {
    match tokio::time::timeout(limit, op).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout),
    }
}

/// Waits for one metric task; a panicked task degrades to the zero sentinel.
async fn join_metric(handle: JoinHandle<i64>, metric: &'static str) -> i64 {
    handle.await.unwrap_or_else(|e| {
        error!(metric, error = %e, "metric task failed");
        0
    })
}
