//! Identity provider backed by the PlugOn API.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, warn};

use plugon_core::Email;

use crate::models::Identity;
use crate::remote::ApiClient;

use super::{AuthError, IdentityProvider, ServerSession};

const LOGIN_PATH: &str = "api/auth/login";
const ME_PATH: &str = "api/auth/me";
const LOGOUT_PATH: &str = "api/auth/logout";

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// `/api/auth/*` endpoints; the session cookie lives in the client's jar.
#[derive(Debug, Clone)]
pub struct RemoteAuth {
    api: ApiClient,
}

impl RemoteAuth {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl IdentityProvider for RemoteAuth {
    async fn login(&self, email: &Email, password: &SecretString) -> Result<Identity, AuthError> {
        let body = LoginRequest {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        let response = self.api.post(LOGIN_PATH, Some(&body)).await?;

        if response.is_success()
            && let Some(user) = response.envelope.as_ref().and_then(|e| e.user.as_ref())
        {
            return Ok(user.clone());
        }

        debug!(status = %response.status, "Login refused");
        match response.message() {
            Some(message) => Err(AuthError::Rejected(message.to_string())),
            None => Err(AuthError::InvalidCredentials),
        }
    }

    async fn who_am_i(&self) -> Result<ServerSession, AuthError> {
        let response = self.api.get(ME_PATH).await?;

        if !response.status.is_success() {
            debug!(status = %response.status, "Server session is gone");
            return Ok(ServerSession::Expired);
        }

        Ok(response
            .envelope
            .filter(|envelope| envelope.success)
            .and_then(|envelope| envelope.user)
            .map_or(ServerSession::Unknown, ServerSession::Active))
    }

    async fn logout(&self) -> Result<Option<String>, AuthError> {
        let response = self.api.post::<()>(LOGOUT_PATH, None).await?;

        if response.status.is_success() {
            return Ok(response.message().map(str::to_string));
        }

        warn!(status = %response.status, "Server refused logout");
        Err(AuthError::Rejected(
            response
                .message()
                .unwrap_or("로그아웃에 실패했습니다.")
                .to_string(),
        ))
    }
}
