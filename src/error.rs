use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::warn;

/// Errors surfaced by the relay.
///
/// The `Display` text of each request-path variant is the exact body sent
/// back to the caller.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Playlist upstream answered with a non-2xx status
    #[error("Fetch Error ({})", .0.as_u16())]
    PlaylistStatus(StatusCode),

    /// Playlist upstream could not be reached or its body could not be read
    #[error("Fetch Error: {0}")]
    PlaylistFetch(#[source] reqwest::Error),

    /// Proxy target answered with a non-2xx status
    #[error("Proxy Fetch Error ({})", .0.as_u16())]
    ProxyStatus(StatusCode),

    /// Proxy target could not be reached
    #[error("Proxy Error: {0}")]
    ProxyFetch(#[source] reqwest::Error),

    /// Proxy path did not decode to a usable URL
    #[error("Proxy Error: {0}")]
    InvalidTarget(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RelayError>;

impl RelayError {
    /// HTTP status reported to the caller for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::PlaylistStatus(status) | RelayError::ProxyStatus(status) => *status,
            RelayError::PlaylistFetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::ProxyFetch(_) | RelayError::InvalidTarget(_) => StatusCode::BAD_GATEWAY,
            RelayError::Config(_) | RelayError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!("Responding {} to caller: {}", status.as_u16(), self);
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn status_errors_render_numeric_code() {
        let err = RelayError::PlaylistStatus(StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Fetch Error (404)");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = RelayError::ProxyStatus(StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "Proxy Fetch Error (403)");
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn invalid_target_maps_to_bad_gateway() {
        let err = RelayError::InvalidTarget("invalid utf-8 sequence".to_string());
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert!(err.to_string().starts_with("Proxy Error: "));
    }

    #[tokio::test]
    async fn into_response_uses_display_as_body() {
        let resp = RelayError::ProxyStatus(StatusCode::SERVICE_UNAVAILABLE).into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Proxy Fetch Error (503)");
    }
}
