use crate::error::RelayError;
use std::env;
use url::Url;

/// Default upstream base used in dev mode
pub const DEV_UPSTREAM_BASE_URL: &str = "https://example.workers.dev/checklist/";

/// Default body for the liveness route
pub const DEFAULT_LIVENESS_MESSAGE: &str = "hlsrelay is running 🚀";

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    /// Base URL that playlist identifiers are appended to. Also sent as the
    /// `Referer` on every proxied fetch.
    pub upstream_base_url: String,
    pub is_dev: bool,
    /// Port for the Prometheus exporter; `None` disables it
    pub metrics_port: Option<u16>,
    /// Body returned by the catch-all liveness route
    pub liveness_message: String,
}

impl Config {
    /// Load configuration from environment variables
    /// In DEV mode, provides sensible defaults. In PROD mode, PORT and
    /// UPSTREAM_BASE_URL are required.
    pub fn from_env() -> Result<Self, RelayError> {
        let is_dev = env::var("DEV_MODE")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);

        // Port: required in prod, defaults to 3000 in dev
        let port = if is_dev {
            env::var("PORT").unwrap_or_else(|_| "3000".to_string())
        } else {
            env::var("PORT")
                .map_err(|_| RelayError::Config("PORT is required in production".into()))?
        };
        let port = port
            .parse::<u16>()
            .map_err(|e| RelayError::Config(format!("Invalid PORT '{port}': {e}")))?;

        let upstream_base_url = if is_dev {
            env::var("UPSTREAM_BASE_URL").unwrap_or_else(|_| DEV_UPSTREAM_BASE_URL.to_string())
        } else {
            env::var("UPSTREAM_BASE_URL").map_err(|_| {
                RelayError::Config("UPSTREAM_BASE_URL is required in production".into())
            })?
        };
        validate_base_url(&upstream_base_url)?;

        let metrics_port = match env::var("METRICS_PORT") {
            Ok(value) => Some(value.parse::<u16>().map_err(|e| {
                RelayError::Config(format!("Invalid METRICS_PORT '{value}': {e}"))
            })?),
            Err(_) => None,
        };

        let liveness_message = env::var("LIVENESS_MESSAGE")
            .unwrap_or_else(|_| DEFAULT_LIVENESS_MESSAGE.to_string());

        Ok(Config {
            port,
            upstream_base_url,
            is_dev,
            metrics_port,
            liveness_message,
        })
    }
}

/// Check that the upstream base is an absolute http(s) URL with a host.
///
/// The base is concatenated with raw path suffixes, so it is kept as the
/// original string rather than the normalized `Url` form.
pub fn validate_base_url(base: &str) -> Result<(), RelayError> {
    let parsed = Url::parse(base)
        .map_err(|e| RelayError::Config(format!("Invalid UPSTREAM_BASE_URL '{base}': {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(RelayError::Config(format!(
                "UPSTREAM_BASE_URL scheme '{scheme}' not allowed, only http/https"
            )));
        }
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(RelayError::Config(format!(
            "UPSTREAM_BASE_URL has no host: {base}"
        )));
    }

    Ok(())
}
