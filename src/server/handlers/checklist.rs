use crate::{
    error::{RelayError, Result},
    hls::rewrite,
    metrics,
    server::state::AppState,
    upstream,
};
use axum::{
    extract::State,
    http::{Uri, header},
    response::{IntoResponse, Response},
};
use std::time::Instant;
use tracing::info;

/// Path prefix for playlist requests
pub const CHECKLIST_PREFIX: &str = "/checklist/";

/// HLS playlist MIME type
const MPEGURL_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";

/// Serve an upstream playlist with every absolute URL routed through `/proxy/`
pub async fn serve_checklist(State(state): State<AppState>, uri: Uri) -> Result<Response> {
    let start = Instant::now();

    let result = fetch_and_rewrite(&state, uri.path()).await;

    let status = match &result {
        Ok(response) => response.status(),
        Err(e) => e.status(),
    };
    metrics::record_request("checklist", status.as_u16());
    metrics::record_duration("checklist", start);

    result
}

async fn fetch_and_rewrite(state: &AppState, path: &str) -> Result<Response> {
    let playlist_id = path.strip_prefix(CHECKLIST_PREFIX).unwrap_or_default();
    let playlist_url = format!("{}{}", state.config.upstream_base_url, playlist_id);

    info!("Fetching playlist from upstream: {}", playlist_url);

    let response = upstream::fetch(&state.http_client, &playlist_url, None)
        .await
        .map_err(|e| {
            metrics::record_upstream_error("checklist");
            RelayError::PlaylistFetch(e)
        })?;

    if !response.status().is_success() {
        return Err(RelayError::PlaylistStatus(response.status()));
    }

    // Always UTF-8, whatever charset the upstream advertises.
    let body = response.bytes().await.map_err(RelayError::PlaylistFetch)?;
    let content = String::from_utf8_lossy(&body);
    let rewritten = rewrite::rewrite_playlist(&content);

    info!(
        "Rewrote playlist {}: {} bytes in, {} bytes out",
        playlist_id,
        content.len(),
        rewritten.len()
    );
    metrics::record_playlist_bytes(rewritten.len());

    Ok(([(header::CONTENT_TYPE, MPEGURL_CONTENT_TYPE)], rewritten).into_response())
}
