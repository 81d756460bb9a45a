//! Handler for the JSONP hit beacon.

use axum::{
    extract::{ConnectInfo, Query, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use tracing::{debug, error};

use crate::application::services::HitCounts;
use crate::domain::{Hit, HitError};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Query parameters of the beacon request.
#[derive(Debug, Deserialize)]
pub struct HitQuery {
    #[serde(rename = "jsonpCallback", default)]
    pub jsonp_callback: String,
}

/// Records one hit and returns the updated counters as a JSONP payload.
///
/// # Endpoint
///
/// `GET /?jsonpCallback=<name>` with the page URL in the `Referer` header.
///
/// # Request Flow
///
/// 1. Resolve the client identity (peer address, or forwarding headers
///    behind a proxy)
/// 2. Decompose the referrer into site and page
/// 3. Fan out the three metric updates and wait for all of them
/// 4. Render the counts into the JSONP body
///
/// A store failure never fails the request; the affected metric is reported
/// as `0` and the response stays `200` (see
/// [`crate::application::services::CounterService`]).
///
/// # Errors
///
/// Returns 404 Not Found if the callback or the referrer is missing.
/// Returns 500 Internal Server Error if the referrer is not a parseable
/// absolute URL. In both cases no counter is touched.
pub async fn hit_handler(
    Query(query): Query<HitQuery>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    let referrer = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let visitor = client_ip(&headers, addr, state.behind_proxy);

    let hit = Hit::from_request(referrer, &query.jsonp_callback, visitor).map_err(|e| match e {
        HitError::MissingCallback => AppError::not_found("invalid request", json!({})),
        HitError::InvalidReferrer(_) => {
            error!(referrer, error = %e, "failed to parse referrer");
            AppError::internal("internal server error", json!({}))
        }
    })?;

    debug!(site = %hit.site, path = %hit.path, visitor = %hit.visitor, "recording hit");

    let counts = state.counter_service.record_hit(&hit).await;

    Ok((
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        jsonp_body(&hit.callback, &counts),
    )
        .into_response())
}

/// Formats the JSONP response body.
///
/// The callback name is inserted verbatim for compatibility with existing
/// beacon clients, so a crafted `jsonpCallback` value can inject script text
/// into the response. The try/catch wrapper keeps a malformed callback from
/// aborting the including page's script execution entirely.
fn jsonp_body(callback: &str, counts: &HitCounts) -> String {
    format!(
        "try{{{callback}({{\"site_uv\":{},\"page_pv\":{},\"version\":2.4,\"site_pv\":{}}})}}catch(e){{}}",
        counts.site_uv, counts.page_pv, counts.site_pv
    )
}
