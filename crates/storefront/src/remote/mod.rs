//! HTTP client for the PlugOn API.
//!
//! Every endpoint answers with the same JSON envelope:
//!
//! ```json
//! { "success": true, "message": "...", "user": { ... }, "product": { ... } }
//! ```
//!
//! The client keeps a cookie jar so the session cookie set by
//! `/api/auth/login` is sent with later calls, the way a browser would with
//! `credentials: 'include'`. A client built with [`ApiClient::persistent`]
//! also writes the jar through a [`KeyValueStore`] whenever the server sets a
//! cookie, and restores it on startup, so a login outlives the process.
//!
//! Callers get the status code and the decoded envelope (when the body was a
//! valid envelope) and decide for themselves what a non-2xx status means.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::SET_COOKIE;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::models::{Identity, Product};
use crate::storage::KeyValueStore;

/// Errors that can occur when talking to the PlugOn API.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP request failed (connection refused, DNS, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint path could not be resolved against the base URL.
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// The server answered with a 5xx status.
    #[error("server error: {0}")]
    Server(StatusCode),
}

/// Response envelope shared by all PlugOn endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Identity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

/// Status code plus decoded envelope.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    /// `None` when the body was empty or not a valid envelope.
    pub envelope: Option<ApiEnvelope>,
}

impl ApiResponse {
    /// Whether the status is 2xx and the envelope reports success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success() && self.envelope.as_ref().is_some_and(|e| e.success)
    }

    /// The envelope's message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.envelope.as_ref().and_then(|e| e.message.as_deref())
    }
}

/// Client for the PlugOn HTTP API.
///
/// Cheap to clone; clones share the connection pool and cookie jar.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

#[derive(Debug)]
struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    jar: Arc<Jar>,
    saved_cookies: Option<SavedCookies>,
}

/// Where a persistent client keeps its cookies.
#[derive(Debug)]
struct SavedCookies {
    storage: Arc<dyn KeyValueStore>,
    key: String,
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// Cookies live only as long as the client.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: Url) -> Result<Self, RemoteError> {
        Self::build(base_url, None)
    }

    /// Create a client whose cookies are kept in `storage` under `key`.
    ///
    /// Cookies saved by an earlier client are loaded into the jar. An
    /// unreadable cookie document is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Http` if the HTTP client cannot be built.
    pub fn persistent(
        base_url: Url,
        storage: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
    ) -> Result<Self, RemoteError> {
        Self::build(
            base_url,
            Some(SavedCookies {
                storage,
                key: key.into(),
            }),
        )
    }

    fn build(mut base_url: Url, saved_cookies: Option<SavedCookies>) -> Result<Self, RemoteError> {
        // Url::join drops the last path segment unless it ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let jar = Arc::new(Jar::default());
        if let Some(saved) = &saved_cookies {
            restore_cookies(&jar, &base_url, saved);
        }

        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                jar,
                saved_cookies,
            }),
        })
    }

    /// The `Cookie` header the client would send to the API root.
    #[must_use]
    pub fn cookie_header(&self) -> Option<String> {
        self.inner
            .jar
            .cookies(&self.inner.base_url)
            .and_then(|value| value.to_str().ok().map(str::to_owned))
    }

    /// The API root.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve an endpoint path (without leading slash) against the base URL.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Url` if the path does not form a valid URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// `GET` an endpoint.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the request could not be sent or the body
    /// could not be read.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, RemoteError> {
        let url = self.endpoint(path)?;
        let response = self.inner.client.get(url).send().await?;
        self.read(path, response).await
    }

    /// `POST` an endpoint with an optional JSON body.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the request could not be sent or the body
    /// could not be read.
    pub async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse, RemoteError> {
        let url = self.endpoint(path)?;
        let mut request = self.inner.client.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        self.read(path, response).await
    }

    async fn read(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<ApiResponse, RemoteError> {
        let status = response.status();
        if response.headers().contains_key(SET_COOKIE) {
            self.save_cookies();
        }
        let text = response.text().await?;

        let envelope = if text.trim().is_empty() {
            None
        } else {
            match serde_json::from_str::<ApiEnvelope>(&text) {
                Ok(envelope) => Some(envelope),
                Err(e) => {
                    debug!(
                        path,
                        status = %status,
                        error = %e,
                        body = %text.chars().take(200).collect::<String>(),
                        "Response body is not an API envelope"
                    );
                    None
                }
            }
        };

        Ok(ApiResponse { status, envelope })
    }

    /// Write the jar through to storage. An empty jar removes the document.
    fn save_cookies(&self) {
        let Some(saved) = &self.inner.saved_cookies else {
            return;
        };

        let result = match self.cookie_header() {
            Some(header) => saved.storage.set(&saved.key, &header),
            None => saved.storage.remove(&saved.key),
        };

        if let Err(e) = result {
            warn!(key = %saved.key, error = %e, "Failed to save API cookies");
        }
    }
}

/// Load a saved `Cookie` header back into the jar, scoped to the API root.
fn restore_cookies(jar: &Jar, base_url: &Url, saved: &SavedCookies) {
    let header = match saved.storage.get(&saved.key) {
        Ok(Some(header)) => header,
        Ok(None) => return,
        Err(e) => {
            warn!(key = %saved.key, error = %e, "Failed to read saved API cookies");
            return;
        }
    };

    let mut restored = 0_usize;
    for pair in header.split(';').map(str::trim).filter(|pair| pair.contains('=')) {
        jar.add_cookie_str(&format!("{pair}; Path={}", base_url.path()), base_url);
        restored += 1;
    }
    debug!(key = %saved.key, restored, "Restored API cookies");
}
