use std::sync::Arc;

use crate::application::services::CounterService;
use crate::domain::CountStore;

/// Shared application state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    pub counter_service: Arc<CounterService>,
    pub store: Arc<dyn CountStore>,
    /// When true, the client identity is read from `X-Forwarded-For` /
    /// `X-Real-IP` headers. Enable only behind a trusted reverse proxy.
    pub behind_proxy: bool,
}
