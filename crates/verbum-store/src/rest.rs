//! Backend connection management.
//!
//! The [`RestStore`] struct owns the HTTP client and the backend's base URL
//! and public API key.  Table CRUD helpers live in `bookmarks.rs`,
//! `highlights.rs` and `plans.rs`; sign-in and sign-out in `auth.rs`.
//!
//! Requests go to the backend's PostgREST interface under `/rest/v1`.  Row
//! level security scopes every row to the user in the bearer token, and the
//! queries additionally filter on `user_id` so an over-broad policy never
//! leaks another user's rows into a view.

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use verbum_shared::constants::{BACKEND_AUTH_PATH, BACKEND_REST_PATH};
use verbum_shared::VerseKey;

use crate::error::{Result, StoreError};
use crate::session::Session;

/// REST client for the hosted backend.
#[derive(Debug, Clone)]
pub struct RestStore {
    base_url: String,
    anon_key: String,
    http: reqwest::Client,
}

impl RestStore {
    /// # Arguments
    /// * `base_url` -- project URL, e.g. `https://xyz.backend.example`.
    /// * `anon_key` -- the project's public API key, sent as `apikey`.
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn table_url(&self, table: &str) -> String {
        format!("{}{}/{}", self.base_url, BACKEND_REST_PATH, table)
    }

    pub(crate) fn auth_url(&self, endpoint: &str) -> String {
        format!("{}{}/{}", self.base_url, BACKEND_AUTH_PATH, endpoint)
    }

    /// Start a request carrying the API key and the bearer token of
    /// `session`, or the API key itself for anonymous reads.
    pub(crate) fn request(
        &self,
        method: Method,
        url: &str,
        session: Option<&Session>,
    ) -> RequestBuilder {
        let token = session
            .map(|s| s.access_token.as_str())
            .unwrap_or(self.anon_key.as_str());
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }

    /// Send and decode a JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let resp = self.send(req).await?;
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(error = %e, "backend body did not decode");
            StoreError::Decode(e.to_string())
        })
    }

    /// Send and discard the body.
    pub(crate) async fn send_empty(&self, req: RequestBuilder) -> Result<()> {
        self.send(req).await.map(|_| ())
    }

    async fn send(&self, req: RequestBuilder) -> Result<reqwest::Response> {
        let resp = req.send().await.map_err(|e| {
            warn!(error = %e, "backend request failed");
            StoreError::Http(e)
        })?;

        let status = resp.status();
        if status.is_success() {
            debug!(status = %status, url = %resp.url(), "backend request ok");
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        warn!(status = %status, body = %body, "backend returned an error status");
        Err(StoreError::Backend {
            status: status.as_u16(),
            body,
        })
    }
}

/// PostgREST equality filter value.
pub(crate) fn eq(value: &str) -> String {
    format!("eq.{value}")
}

/// PostgREST `in` filter over verse keys.  Keys are quoted because they
/// contain spaces and the `.` delimiter.
pub(crate) fn in_keys(keys: &[VerseKey]) -> String {
    let quoted: Vec<String> = keys
        .iter()
        .map(|k| {
            format!(
                "\"{}\"",
                k.as_str().replace('\\', "\\\\").replace('"', "\\\"")
            )
        })
        .collect();
    format!("in.({})", quoted.join(","))
}
