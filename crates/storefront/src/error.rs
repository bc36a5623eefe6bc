//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that front ends (the CLI, a UI shell)
//! return from their command handlers. [`AppError::report`] captures
//! infrastructure failures to Sentry; user mistakes are only logged.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::remote::RemoteError;
use crate::services::auth::AuthError;
use crate::services::shop::ShopError;
use crate::storage::StorageError;
use crate::stores::CartError;

/// Application-level error type for the platform core.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A remote client could not be built or reached.
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Product lookup failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Shopping operation failed.
    #[error("Shop error: {0}")]
    Shop(#[from] ShopError),

    /// Persistent storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        Self::Shop(ShopError::Cart(err))
    }
}

impl AppError {
    /// Whether this is an infrastructure failure rather than a user mistake.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::Remote(_)
                | Self::Storage(_)
                | Self::Catalog(_)
                | Self::Auth(AuthError::Unavailable(_))
                | Self::Shop(ShopError::Cart(CartError::Catalog(_)))
        )
    }

    /// Message suitable for showing to the user.
    ///
    /// Internal error details are not exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(e) => format!("설정 오류: {e}"),
            Self::Remote(_) => "서버에 연결할 수 없습니다. 잠시 후 다시 시도해주세요.".to_string(),
            Self::Storage(_) => "저장소 오류가 발생했습니다.".to_string(),
            Self::Catalog(_) => "상품 정보를 불러올 수 없습니다.".to_string(),
            Self::Auth(e) => e.user_message(),
            Self::Shop(e) => e.user_message().to_string(),
            Self::NotFound(what) => format!("찾을 수 없습니다: {what}"),
            Self::BadRequest(msg) => msg.clone(),
        }
    }

    /// Log the error, capturing internal failures to Sentry.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Command error"
            );
        } else {
            tracing::warn!(error = %self, "Command failed");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
