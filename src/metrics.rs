//! Prometheus metrics.
//!
//! Recording goes through the `metrics` facade and is a no-op until
//! [`install_exporter`] has run, so handlers and tests never need to check.

use crate::error::RelayError;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;
use tracing::info;

/// Count one handled request for `route` with its final status.
pub fn record_request(route: &'static str, status: u16) {
    counter!("hlsrelay_requests_total", "route" => route, "status" => status.to_string())
        .increment(1);
}

/// Record wall-clock handling time for `route` since `start`.
pub fn record_duration(route: &'static str, start: Instant) {
    histogram!("hlsrelay_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Count an upstream fetch that failed at the transport level.
pub fn record_upstream_error(route: &'static str) {
    counter!("hlsrelay_upstream_errors_total", "route" => route).increment(1);
}

/// Count bytes of playlist text produced by the rewrite pass.
pub fn record_playlist_bytes(bytes: usize) {
    counter!("hlsrelay_playlist_bytes_total").increment(bytes as u64);
}

/// Start the Prometheus scrape endpoint on its own listener.
///
/// Must be called from within a Tokio runtime.
pub fn install_exporter(port: u16) -> Result<(), RelayError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| RelayError::Config(format!("Failed to install metrics exporter: {e}")))?;

    info!("📈 Metrics exporter listening on http://{}/metrics", addr);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_without_exporter_is_noop() {
        let start = Instant::now();
        record_request("proxy", 200);
        record_duration("proxy", start);
        record_upstream_error("checklist");
        record_playlist_bytes(1024);
    }
}
