//! Shared HTTP plumbing for the service clients.

use std::time::Duration;

use reqwest::Url;

/// User agent sent on every service call.
pub const USER_AGENT: &str = concat!("flowhook/", env!("CARGO_PKG_VERSION"));

/// Upper bound on the error body excerpt carried into error messages.
const ERROR_BODY_LIMIT: usize = 512;

/// Build the reqwest client shared by a service adapter.
pub fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// Parse `base` and append `segments` as percent-encoded path segments.
///
/// A trailing slash on `base` does not produce an empty segment.
pub fn join_segments(base: &str, segments: &[&str]) -> Result<Url, String> {
    let mut url = Url::parse(base).map_err(|e| format!("invalid base URL '{base}': {e}"))?;
    url.path_segments_mut()
        .map_err(|()| format!("base URL '{base}' cannot carry a path"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Read a failed response's body for diagnostics, truncated.
pub async fn error_body(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    truncate(body.trim(), ERROR_BODY_LIMIT)
}

fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
