//! Smoke check for a deployed relay.
//!
//! Requests one playlist through the relay, confirms its URLs were rewritten,
//! then follows the first rewritten link and checks that bytes come back.

use regex::Regex;
use reqwest::{Client, StatusCode, header};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::info;

/// Channel checked when none is given
pub const DEFAULT_CHANNEL: &str = "androstreamlivebs1.m3u8";

/// A rewritten link as it appears in relay output
static PROXY_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/proxy/https?%3A%2F%2F\S+").expect("valid proxy link regex")
});

#[derive(Error, Debug)]
pub enum SmokeError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Playlist request returned HTTP {0}")]
    PlaylistStatus(StatusCode),

    #[error("Unexpected playlist Content-Type: {0:?}")]
    ContentType(String),

    #[error("No proxy links found in playlist")]
    NoProxyLinks,

    #[error("Proxy request returned HTTP {0}")]
    ProxyStatus(StatusCode),

    #[error("Proxy response body was empty")]
    EmptyProxyBody,
}

/// What a passing smoke check observed
#[derive(Debug, Clone, PartialEq)]
pub struct SmokeReport {
    /// Size of the rewritten playlist in bytes
    pub playlist_bytes: usize,
    /// Number of `/proxy/` links found in the playlist
    pub proxy_links: usize,
    /// The link that was followed
    pub first_link: String,
    /// Size of the first body chunk returned for that link
    pub first_chunk_bytes: usize,
}

/// Find every rewritten proxy link in relay playlist output.
pub fn find_proxy_links(playlist: &str) -> Vec<&str> {
    PROXY_LINK_RE
        .find_iter(playlist)
        .map(|m| m.as_str())
        .collect()
}

/// Run the smoke check against `relay_url` (no trailing slash needed).
pub async fn run(
    client: &Client,
    relay_url: &str,
    channel: &str,
) -> Result<SmokeReport, SmokeError> {
    let relay_url = relay_url.trim_end_matches('/');
    let playlist_url = format!("{relay_url}/checklist/{channel}");
    info!("Requesting playlist: {}", playlist_url);

    let response = client.get(&playlist_url).send().await?;
    if response.status() != StatusCode::OK {
        return Err(SmokeError::PlaylistStatus(response.status()));
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !content_type.contains("mpegurl") {
        return Err(SmokeError::ContentType(content_type));
    }

    let playlist = response.text().await?;
    info!("Playlist size: {} bytes", playlist.len());

    let links = find_proxy_links(&playlist);
    let first_link = links.first().ok_or(SmokeError::NoProxyLinks)?.to_string();
    info!("Found {} proxy links, following {}", links.len(), first_link);

    let mut proxied = client.get(format!("{relay_url}{first_link}")).send().await?;
    if proxied.status() != StatusCode::OK {
        return Err(SmokeError::ProxyStatus(proxied.status()));
    }

    let first_chunk = proxied.chunk().await?.ok_or(SmokeError::EmptyProxyBody)?;
    if first_chunk.is_empty() {
        return Err(SmokeError::EmptyProxyBody);
    }
    info!("First proxied chunk: {} bytes", first_chunk.len());

    Ok(SmokeReport {
        playlist_bytes: playlist.len(),
        proxy_links: links.len(),
        first_link,
        first_chunk_bytes: first_chunk.len(),
    })
}
