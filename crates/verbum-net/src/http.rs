//! Shared HTTP plumbing for the upstream clients.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{NetError, Result};

/// Build the `reqwest` client shared by every upstream and backend call.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("verbum/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Short, human-readable description of a transport failure.
pub fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "the request timed out".to_string()
    } else if e.is_connect() || e.is_request() {
        "could not connect to the service".to_string()
    } else if e.is_decode() {
        "unexpected response format".to_string()
    } else {
        e.to_string()
    }
}

/// GET `url` and decode the JSON body.
///
/// Returns `Ok(None)` on 404 so callers can treat a missing chapter as an
/// empty one; every other non-success status is `UpstreamUnavailable`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &reqwest::Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<Option<T>> {
    debug!(url = %url, "upstream request");

    let resp = http
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| {
            warn!(url = %url, error = %e, "upstream request failed");
            NetError::UpstreamUnavailable(format!("{url}: {}", describe_transport_error(&e)))
        })?;

    match resp.status() {
        status if status.is_success() => {
            let bytes = resp.bytes().await.map_err(|e| {
                NetError::UpstreamUnavailable(format!("{url}: {}", describe_transport_error(&e)))
            })?;
            let body = serde_json::from_slice::<T>(&bytes).map_err(|e| {
                warn!(url = %url, error = %e, "upstream body did not match schema");
                NetError::UpstreamUnavailable(format!("{url}: unexpected response format ({e})"))
            })?;
            Ok(Some(body))
        }
        StatusCode::NOT_FOUND => {
            debug!(url = %url, "upstream returned 404");
            Ok(None)
        }
        status => {
            let body = resp.text().await.unwrap_or_default();
            warn!(url = %url, status = %status, "upstream returned an error status");
            if body.trim().is_empty() {
                Err(NetError::UpstreamUnavailable(format!(
                    "{url} returned {status}"
                )))
            } else {
                Err(NetError::UpstreamUnavailable(format!(
                    "{url} returned {status}: {}",
                    body.trim()
                )))
            }
        }
    }
}

/// Strip trailing slashes from a configured base URL.
pub(crate) fn normalize_base(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_string()
}
