//! Playlist text rewriting.
//!
//! Works on raw text rather than a parsed playlist: upstream manifests are
//! not always well-formed, and every line other than the URLs must pass
//! through byte-for-byte.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Path prefix that proxied URLs are rewritten onto
pub const PROXY_PREFIX: &str = "/proxy/";

/// Host suffix repaired by [`fix_dev_hosts`]
const DEV_SUFFIX: &str = ".dev";

/// Absolute http(s) URL: scheme followed by a maximal run of non-whitespace.
///
/// Deliberately loose. Anything up to the next whitespace belongs to the URL.
static ABSOLUTE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("valid absolute URL regex"));

/// Everything except ASCII alphanumerics and `- _ . ! ~ * ' ( )` is escaped,
/// so reserved characters like `:` `/` `?` `&` never survive into the path.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Insert a `/` after every `.dev` that is not already followed by one.
///
/// Some upstream playlists emit a bare `https://host.dev` with the path
/// separator missing. Only the literal `.dev` suffix is repaired.
pub fn fix_dev_hosts(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(idx) = rest.find(DEV_SUFFIX) {
        let end = idx + DEV_SUFFIX.len();
        out.push_str(&rest[..end]);
        rest = &rest[end..];
        if !rest.starts_with('/') {
            out.push('/');
        }
    }
    out.push_str(rest);
    out
}

/// Percent-encode a URL so it fits in a single path segment.
pub fn encode_component(url: &str) -> String {
    utf8_percent_encode(url, COMPONENT).to_string()
}

/// Why a percent-encoded component could not be decoded
#[derive(Error, Debug, PartialEq)]
pub enum DecodeError {
    #[error("malformed percent-escape at byte {0}")]
    MalformedEscape(usize),

    #[error("target is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Reverse [`encode_component`].
///
/// Every `%` must be followed by two hex digits and the decoded bytes must
/// be valid UTF-8.
pub fn decode_component(encoded: &str) -> Result<String, DecodeError> {
    let bytes = encoded.as_bytes();
    for (idx, _) in encoded.match_indices('%') {
        let valid = matches!(
            bytes.get(idx + 1..idx + 3),
            Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
        );
        if !valid {
            return Err(DecodeError::MalformedEscape(idx));
        }
    }

    let decoded = percent_decode_str(encoded).decode_utf8()?;
    Ok(decoded.into_owned())
}

/// Replace every absolute URL in `text` with `/proxy/<encoded-url>`.
pub fn proxy_urls(text: &str) -> String {
    ABSOLUTE_URL_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            format!("{}{}", PROXY_PREFIX, encode_component(&caps[0]))
        })
        .into_owned()
}

/// Full playlist pass: repair `.dev` hosts, then route all URLs through the proxy.
pub fn rewrite_playlist(text: &str) -> String {
    proxy_urls(&fix_dev_hosts(text))
}
