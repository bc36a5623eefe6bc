//! Authentication service.
//!
//! Logs users in and out through an [`IdentityProvider`] and keeps the
//! [`SessionStore`] in step with the provider's view of the session.
//!
//! Two providers exist:
//!
//! - [`DemoAccounts`] - a fixed account table, used when no API is configured
//! - [`RemoteAuth`] - `/api/auth/{login,me,logout}` on the PlugOn API

mod demo;
mod error;
mod remote;

pub use demo::{DemoAccount, DemoAccounts};
pub use error::AuthError;
pub use remote::RemoteAuth;

use std::future::Future;

use secrecy::SecretString;
use tracing::{info, instrument, warn};

use plugon_core::Email;

use crate::config::PlugonConfig;
use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::models::Identity;
use crate::remote::{ApiClient, RemoteError};
use crate::stores::SessionStore;

/// What the provider knows about the current server-side session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerSession {
    /// Logged in as this identity.
    Active(Identity),
    /// The server says nobody is logged in.
    Expired,
    /// The provider cannot tell; keep local state.
    Unknown,
}

/// Authenticates users and reports on the server-side session.
pub trait IdentityProvider {
    /// Exchange credentials for an identity.
    fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<Identity, AuthError>> + Send;

    /// Ask who the server thinks is logged in.
    fn who_am_i(&self) -> impl Future<Output = Result<ServerSession, AuthError>> + Send;

    /// End the server-side session. Returns the server's message, if any.
    fn logout(&self) -> impl Future<Output = Result<Option<String>, AuthError>> + Send;
}

/// The configured identity provider.
#[derive(Debug)]
pub enum AuthBackend {
    Demo(DemoAccounts),
    Remote(RemoteAuth),
}

impl AuthBackend {
    /// Remote auth when an API base URL is configured, demo accounts otherwise.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the HTTP client cannot be built.
    pub fn from_config(config: &PlugonConfig) -> Result<Self, RemoteError> {
        let api = config.api_base_url.clone().map(ApiClient::new).transpose()?;
        Ok(Self::with_api(api))
    }

    /// Remote auth over `api` when given, demo accounts otherwise.
    #[must_use]
    pub fn with_api(api: Option<ApiClient>) -> Self {
        api.map_or_else(
            || Self::Demo(DemoAccounts::builtin()),
            |api| Self::Remote(RemoteAuth::new(api)),
        )
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Demo(_) => "demo",
            Self::Remote(_) => "remote",
        }
    }
}

impl IdentityProvider for AuthBackend {
    async fn login(&self, email: &Email, password: &SecretString) -> Result<Identity, AuthError> {
        match self {
            Self::Demo(demo) => demo.login(email, password).await,
            Self::Remote(remote) => remote.login(email, password).await,
        }
    }

    async fn who_am_i(&self) -> Result<ServerSession, AuthError> {
        match self {
            Self::Demo(demo) => demo.who_am_i().await,
            Self::Remote(remote) => remote.who_am_i().await,
        }
    }

    async fn logout(&self) -> Result<Option<String>, AuthError> {
        match self {
            Self::Demo(demo) => demo.logout().await,
            Self::Remote(remote) => remote.logout().await,
        }
    }
}

/// Result of [`AuthService::logout`]. The local session is cleared either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutOutcome {
    /// Whether the provider acknowledged the logout.
    pub remote_ok: bool,
    /// Server message on success, error description on failure.
    pub message: Option<String>,
}

/// Result of [`AuthService::sync`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nobody is logged in locally; the provider was not asked.
    Skipped,
    /// The identity was replaced with the server's copy.
    Refreshed,
    /// The server said the session is gone; the identity was cleared.
    Cleared,
    /// The provider could not answer; local state kept.
    Kept,
}

/// Authentication service.
///
/// Borrows the provider and the session store for the duration of one
/// operation.
pub struct AuthService<'a, P> {
    provider: &'a P,
    session: &'a mut SessionStore,
}

impl<'a, P: IdentityProvider + Sync> AuthService<'a, P> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(provider: &'a P, session: &'a mut SessionStore) -> Self {
        Self { provider, session }
    }

    /// Login with email and password.
    ///
    /// On success the identity is stored in the session and returned.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid,
    /// before the provider is contacted. Otherwise returns whatever the
    /// provider reported; the session is unchanged on failure.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn login(
        &mut self,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, AuthError> {
        let email = Email::parse(email)?;
        let identity = self.provider.login(&email, password).await?;

        set_sentry_user(&identity.id, Some(identity.email.as_str()));
        add_breadcrumb("auth", "Logged in", Some(&[("role", identity.role.as_str())]));
        info!(user_id = %identity.id, role = %identity.role, "Logged in");

        self.session.set_identity(identity.clone());
        Ok(identity)
    }

    /// Log out remotely, then always clear the local session.
    #[instrument(skip_all)]
    pub async fn logout(&mut self) -> LogoutOutcome {
        let outcome = match self.provider.logout().await {
            Ok(message) => LogoutOutcome {
                remote_ok: true,
                message,
            },
            Err(e) => {
                warn!(error = %e, "Remote logout failed; clearing local session anyway");
                LogoutOutcome {
                    remote_ok: false,
                    message: Some(e.user_message()),
                }
            }
        };

        self.session.clear_identity();
        clear_sentry_user();
        add_breadcrumb("auth", "Logged out", None);
        info!(remote_ok = outcome.remote_ok, "Logged out");
        outcome
    }

    /// Reconcile the local session with the provider.
    ///
    /// Only runs when a local identity exists. Transport failures keep the
    /// local identity.
    #[instrument(skip_all)]
    pub async fn sync(&mut self) -> SyncOutcome {
        if !self.session.is_authenticated() {
            return SyncOutcome::Skipped;
        }

        match self.provider.who_am_i().await {
            Ok(ServerSession::Active(identity)) => {
                set_sentry_user(&identity.id, Some(identity.email.as_str()));
                self.session.set_identity(identity);
                SyncOutcome::Refreshed
            }
            Ok(ServerSession::Expired) => {
                info!("Server session expired; clearing local session");
                self.session.clear_identity();
                clear_sentry_user();
                SyncOutcome::Cleared
            }
            Ok(ServerSession::Unknown) => SyncOutcome::Kept,
            Err(e) => {
                warn!(error = %e, "Session sync failed; keeping local session");
                SyncOutcome::Kept
            }
        }
    }
}
