//! Shared HTTP client construction and status mapping.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Response;

use crate::error::{Result, ScoutError};

/// Build the HTTP client shared by the model provider and the search tool.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(10)
        .build()?)
}

/// Default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(mut val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        val.set_sensitive(true);
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Pass a 2xx response through; turn anything else into a typed error.
pub async fn ensure_success(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(status_to_error(status.as_u16(), &body))
}

/// Map an HTTP error status to an error, keeping the body as the message.
pub fn status_to_error(status: u16, body: &str) -> ScoutError {
    match status {
        401 | 403 => ScoutError::Authentication(body.to_string()),
        429 => ScoutError::RateLimited {
            retry_after_ms: extract_retry_after(body),
        },
        _ => ScoutError::api(status, body),
    }
}

fn extract_retry_after(body: &str) -> Option<u64> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("retry_after"))
                .and_then(|r| r.as_f64())
                .map(|s| (s * 1000.0) as u64)
        })
}
