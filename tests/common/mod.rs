#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use tower::Layer;

use hit_counter::application::services::CounterService;
use hit_counter::domain::{CountStore, KeySpace, StoreError, StoreResult};
use hit_counter::infrastructure::store::MemoryStore;
use hit_counter::routes::app_router;
use hit_counter::state::AppState;

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// Operations that [`TestStore`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOp {
    None,
    SetAdd,
    SetCard,
    /// Fail `hash_incr` for the site page-view hash only.
    SitePv,
    /// Fail `hash_incr` for the page page-view hashes only.
    PagePv,
    Health,
}

/// A counting store for tests: delegates to [`MemoryStore`], counts every
/// mutation attempt, and can fail one class of operations on demand.
pub struct TestStore {
    inner: MemoryStore,
    fail: FailOp,
    write_attempts: AtomicUsize,
}

impl TestStore {
    pub fn new() -> Self {
        Self::failing(FailOp::None)
    }

    pub fn failing(fail: FailOp) -> Self {
        Self {
            inner: MemoryStore::new(),
            fail,
            write_attempts: AtomicUsize::new(0),
        }
    }

    /// Number of `set_add` / `hash_incr` calls the store has seen.
    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }

    fn broken(&self, op: FailOp) -> StoreResult<()> {
        if self.fail == op {
            Err(StoreError::Operation("injected failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CountStore for TestStore {
    async fn set_add(&self, key: &str, member: &str) -> StoreResult<()> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        self.broken(FailOp::SetAdd)?;
        self.inner.set_add(key, member).await
    }

    async fn set_card(&self, key: &str) -> StoreResult<i64> {
        self.broken(FailOp::SetCard)?;
        self.inner.set_card(key).await
    }

    async fn hash_incr(&self, key: &str, field: &str, delta: i64) -> StoreResult<i64> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        if key.starts_with("page_pv:") {
            self.broken(FailOp::PagePv)?;
        } else {
            self.broken(FailOp::SitePv)?;
        }
        self.inner.hash_incr(key, field, delta).await
    }

    async fn health_check(&self) -> bool {
        self.fail != FailOp::Health
    }
}

/// Builds the application state around the given store.
///
/// `behind_proxy` is enabled so tests can pick the visitor identity via the
/// `X-Forwarded-For` header instead of the (mocked) peer address.
pub fn test_state(store: Arc<dyn CountStore>) -> AppState {
    let counter_service = Arc::new(CounterService::new(
        store.clone(),
        KeySpace::new(""),
        Duration::from_millis(500),
    ));

    AppState {
        counter_service,
        store,
        behind_proxy: true,
    }
}

/// Full application router wrapped in a mocked peer address, served in-process.
pub fn test_server(store: Arc<dyn CountStore>) -> TestServer {
    let app = app_router(test_state(store)).layer(MockConnectInfoLayer);
    TestServer::new(app).unwrap()
}
