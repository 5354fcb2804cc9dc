use crate::config::Config;
use reqwest::Client;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Shared HTTP client; connection reuse is left to reqwest
    pub http_client: Client,
}

impl AppState {
    /// Create a new AppState with the given configuration and client
    pub fn new(config: Config, http_client: Client) -> Self {
        Self {
            config: Arc::new(config),
            http_client,
        }
    }
}
