//! Shared-token check for the WebSocket upgrade.
//!
//! A phone proves it is allowed to drive the pointer by presenting the token
//! configured at startup.  It may send it in either of two places:
//!
//! 1. the `token` query parameter (`/ws?token=...`), or
//! 2. the `X-Auth-Token` request header.
//!
//! The query parameter wins when it is present and non-empty.  Browsers
//! cannot set custom headers on a WebSocket upgrade, so browser clients use
//! the query form; the header exists for native clients.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use thiserror::Error;

/// Query parameter carrying the token.
pub const TOKEN_QUERY_PARAM: &str = "token";

/// Header carrying the token (compared case-insensitively by `http`).
pub const TOKEN_HEADER: &str = "x-auth-token";

/// Why an upgrade request was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("no token presented")]
    Missing,
    #[error("token mismatch")]
    Mismatch,
}

/// Picks the token the client presented.
///
/// `query` is the raw query string (without `?`), `header` the value of
/// [`TOKEN_HEADER`].  Returns `None` when neither carries a non-empty token.
pub fn presented_token<'a>(
    query: Option<&'a str>,
    header: Option<&'a str>,
) -> Option<Cow<'a, str>> {
    let from_query = query
        .and_then(|q| query_param(q, TOKEN_QUERY_PARAM))
        .filter(|t| !t.is_empty());

    from_query.or_else(|| header.filter(|h| !h.is_empty()).map(Cow::Borrowed))
}

/// Checks `presented` against `expected`.
///
/// # Errors
///
/// [`AuthError::Missing`] when nothing was presented, [`AuthError::Mismatch`]
/// when the values differ.
pub fn verify_token(expected: &str, presented: Option<&str>) -> Result<(), AuthError> {
    let presented = presented.ok_or(AuthError::Missing)?;
    if constant_time_eq(expected.as_bytes(), presented.as_bytes()) {
        Ok(())
    } else {
        Err(AuthError::Mismatch)
    }
}

/// Returns the first value of `name` in a `k=v&k=v` query string.
fn query_param<'a>(query: &'a str, name: &str) -> Option<Cow<'a, str>> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        (form_decode(k) == name).then(|| form_decode(v))
    })
}

/// Form-style decoding: `+` is a space, then `%XX` escapes.  Invalid escapes
/// are kept literally.
fn form_decode(raw: &str) -> Cow<'_, str> {
    if raw.contains('+') {
        let spaced = raw.replace('+', " ");
        Cow::Owned(percent_decode_str(&spaced).decode_utf8_lossy().into_owned())
    } else {
        percent_decode_str(raw).decode_utf8_lossy()
    }
}

/// Compares without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

// ── Tests ─────────────────────────────────────────────────────────────────────
