//! Conditional request headers.

use http::HeaderMap;
use http::header::IF_MODIFIED_SINCE;
use std::time::SystemTime;
use tracing::warn;

/// The date of the `If-Modified-Since` header, `None` when absent or malformed.
pub fn if_modified_since(headers: &HeaderMap) -> Option<SystemTime> {
    let value = headers.get(IF_MODIFIED_SINCE)?;

    match value.to_str().ok().map(httpdate::parse_http_date) {
        Some(Ok(date)) => Some(date),
        _ => {
            warn!(value = ?value, "ignored malformed If-Modified-Since header");
            None
        }
    }
}

/// Formats `date` as an HTTP date, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn format_http_date(date: SystemTime) -> String {
    httpdate::fmt_http_date(date)
}
