/// HTMX utils
use axum::http::{HeaderMap, HeaderValue};

/// Fire a client-side event on `body` once the response is swapped in.
pub fn trigger(event: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "Hx-Trigger",
        HeaderValue::from_str(event)
            .unwrap_or(HeaderValue::from_static("")),
    );
    headers
}
