//! Same-origin HLS relay.
//!
//! Fetches upstream playlists, rewrites every absolute URL to go back
//! through `/proxy/`, and streams proxied resources with permissive CORS
//! headers so a browser player can load everything from one origin.

pub mod config;
pub mod error;
pub mod hls;
pub mod metrics;
pub mod server;
pub mod smoke;
pub mod upstream;
