//! Smoke-check a running relay: `RELAY_URL=https://relay.example.dev relay-smoke`

use hlsrelay::smoke::{self, DEFAULT_CHANNEL};
use std::env;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let Ok(relay_url) = env::var("RELAY_URL") else {
        error!("RELAY_URL is required");
        std::process::exit(2);
    };
    let channel = env::var("SMOKE_CHANNEL").unwrap_or_else(|_| DEFAULT_CHANNEL.to_string());

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    match smoke::run(&client, &relay_url, &channel).await {
        Ok(report) => {
            info!(
                playlist_bytes = report.playlist_bytes,
                proxy_links = report.proxy_links,
                first_chunk_bytes = report.first_chunk_bytes,
                "🎉 Smoke check passed, followed {}",
                report.first_link
            );
        }
        Err(e) => {
            error!("Smoke check failed: {}", e);
            std::process::exit(1);
        }
    }
}
