//! Email/password sign-in against the backend's auth service.

use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::error::{Result, StoreError};
use crate::rest::RestStore;
use crate::session::Session;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl RestStore {
    /// Exchange credentials for a [`Session`].
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let url = self.auth_url("token");
        let req = self
            .request(Method::POST, &url, None)
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));

        let token: TokenResponse = match self.send_json(req).await {
            Ok(t) => t,
            Err(StoreError::Backend { status, .. })
                if status == StatusCode::BAD_REQUEST.as_u16()
                    || status == StatusCode::UNAUTHORIZED.as_u16() =>
            {
                warn!(status, "sign-in rejected");
                return Err(StoreError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        info!(user = %token.user.id, "signed in");
        Ok(Session {
            user_id: token.user.id,
            access_token: token.access_token,
            email: token.user.email,
        })
    }

    /// Revoke the session's token.
    pub async fn sign_out(&self, session: &Session) -> Result<()> {
        let url = self.auth_url("logout");
        let req = self.request(Method::POST, &url, Some(session));
        self.send_empty(req).await?;
        info!(user = %session.user_id, "signed out");
        Ok(())
    }
}
