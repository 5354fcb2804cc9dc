//! CORS handling.
//!
//! Every response gets the same two permissive headers. Preflight requests
//! are answered here and never reach a handler.

use axum::{
    extract::Request,
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::debug;

/// Value of `Access-Control-Allow-Origin`
pub const ALLOW_ORIGIN: &str = "*";

/// Value of `Access-Control-Allow-Methods`
pub const ALLOW_METHODS: &str = "GET, HEAD, OPTIONS";

/// Layer that stamps `Access-Control-Allow-Origin` on every response.
pub fn allow_origin_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    )
}

/// Layer that stamps `Access-Control-Allow-Methods` on every response.
pub fn allow_methods_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    )
}

/// Axum middleware: answer `OPTIONS` on any path with an empty 200.
pub async fn preflight_middleware(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        debug!("Answering preflight for {}", req.uri().path());
        return StatusCode::OK.into_response();
    }

    next.run(req).await
}
