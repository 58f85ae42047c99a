use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::Error;

/// Longest provider body excerpt kept for logs.
const DETAIL_LIMIT: usize = 512;

/// Per-call bound on provider requests unless configured otherwise.
pub(crate) const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the shared outbound client; every call it makes is bounded by `timeout`.
pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Config(format!("HTTP client: {e}")))
}

/// Client used by the default constructors, bounded by [`DEFAULT_UPSTREAM_TIMEOUT`].
pub(crate) fn default_http_client() -> reqwest::Client {
    build_http_client(DEFAULT_UPSTREAM_TIMEOUT).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Falling back to an HTTP client without a timeout");
        reqwest::Client::new()
    })
}

/// Checks HTTP response status; returns the response on success or an error with details.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    operation: &'static str,
) -> Result<reqwest::Response, Error> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let detail = truncate(&body);
    tracing::warn!(operation, status, detail = %detail, "Upstream returned an error status");
    Err(Error::UpstreamStatus {
        operation,
        status,
        detail,
    })
}

/// Reads the whole body and decodes it, classifying decode failures as malformed.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    operation: &'static str,
) -> Result<T, Error> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| Error::MalformedResponse {
        operation,
        detail: e.to_string(),
    })
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(DETAIL_LIMIT) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_kept() {
        assert_eq!(truncate("{\"error\":\"invalid_grant\"}"), "{\"error\":\"invalid_grant\"}");
    }

    #[test]
    fn long_bodies_are_cut() {
        let body = "x".repeat(DETAIL_LIMIT + 100);
        let cut = truncate(&body);
        assert_eq!(cut.len(), DETAIL_LIMIT + 3);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn multibyte_bodies_cut_on_char_boundary() {
        let body = "é".repeat(DETAIL_LIMIT + 1);
        let cut = truncate(&body);
        assert_eq!(cut.chars().count(), DETAIL_LIMIT + 3);
    }
}
