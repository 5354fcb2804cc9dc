use crate::{
    error::{RelayError, Result},
    hls::rewrite::{self, PROXY_PREFIX},
    metrics,
    server::state::AppState,
    upstream,
};
use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Uri, header},
    response::{IntoResponse, Response},
};
use std::time::Instant;
use tracing::info;

/// Fallback when the upstream sends no `Content-Type`
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Proxy an arbitrary upstream resource back to the player
///
/// The path suffix after `/proxy/` is the percent-encoded target URL, as
/// produced by the playlist rewrite. The body is streamed through untouched.
pub async fn serve_proxy(State(state): State<AppState>, uri: Uri) -> Result<Response> {
    let start = Instant::now();

    let result = proxy_target(&state, uri.path()).await;

    let status = match &result {
        Ok(response) => response.status(),
        Err(e) => e.status(),
    };
    metrics::record_request("proxy", status.as_u16());
    metrics::record_duration("proxy", start);

    result
}

async fn proxy_target(state: &AppState, path: &str) -> Result<Response> {
    let encoded = path.strip_prefix(PROXY_PREFIX).unwrap_or_default();

    let decoded =
        rewrite::decode_component(encoded).map_err(|e| RelayError::InvalidTarget(e.to_string()))?;
    let target = rewrite::fix_dev_hosts(&decoded);

    info!("Proxying upstream resource: {}", target);

    let response = upstream::fetch(
        &state.http_client,
        &target,
        Some(state.config.upstream_base_url.as_str()),
    )
    .await
    .map_err(|e| {
        metrics::record_upstream_error("proxy");
        RelayError::ProxyFetch(e)
    })?;

    if !response.status().is_success() {
        return Err(RelayError::ProxyStatus(response.status()));
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

    Ok((
        [(header::CONTENT_TYPE, content_type)],
        Body::from_stream(response.bytes_stream()),
    )
        .into_response())
}
