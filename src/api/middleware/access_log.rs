//! Per-request access logging.

use axum::{
    extract::{ConnectInfo, Request},
    http::header,
    middleware::Next,
    response::Response,
};
use std::{net::SocketAddr, time::Instant};

/// Logs one line per request with the client address and the referring page.
///
/// The referrer is the attribution key of this service, so it is part of
/// every access-log line alongside the usual method/path/status/latency.
pub async fn access_log_mw(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();

    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let referer = req
        .headers()
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let response = next.run(req).await;

    tracing::info!(
        ip = %addr.ip(),
        method,
        path,
        status = response.status().as_u16(),
        referer,
        ms = start.elapsed().as_millis() as u64,
        "request",
    );

    response
}
