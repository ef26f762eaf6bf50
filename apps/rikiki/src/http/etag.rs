//! ETags for status polling.
//!
//! Front ends poll the status endpoints every second or so. The tag is a
//! hash of `Game::status_summary`, so a poll that finds nothing new is
//! answered with `304 Not Modified` and no body.

use actix_web::http::header;
use actix_web::HttpRequest;
use xxhash_rust::xxh3::xxh3_64;

/// Strong ETag for a status summary, quotes included.
///
/// # Example
/// ```
/// # use rikiki::http::etag::summary_etag;
/// let etag = summary_etag("2:9:Confirming:-");
/// assert!(etag.starts_with('"') && etag.ends_with('"'));
/// ```
pub fn summary_etag(summary: &str) -> String {
    format!("\"{:016x}\"", xxh3_64(summary.as_bytes()))
}

/// True when `If-None-Match` lists `etag` (or is `*`).
pub fn if_none_match(req: &HttpRequest, etag: &str) -> bool {
    let Some(value) = req
        .headers()
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    value.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.trim_start_matches("W/") == etag
    })
}
