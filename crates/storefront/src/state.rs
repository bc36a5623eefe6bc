//! Application state owned by a front end.
//!
//! One `AppState` per process holds the configuration, both stores and both
//! collaborators. Services borrow from it for the duration of one operation;
//! there are no globals.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::PlugonConfig;
use crate::remote::{ApiClient, RemoteError};
use crate::services::auth::{AuthBackend, AuthService};
use crate::services::shop::ShopService;
use crate::storage::{FileStorage, KeyValueStore};
use crate::stores::{CartStore, SessionStore};

/// Application state for the platform core.
#[derive(Debug)]
pub struct AppState {
    config: PlugonConfig,
    storage: Arc<dyn KeyValueStore>,
    session: SessionStore,
    cart: CartStore,
    catalog: Catalog,
    auth: AuthBackend,
}

impl AppState {
    /// Create state persisted under `config.storage_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client for the configured API cannot be
    /// built.
    pub fn from_config(config: PlugonConfig) -> Result<Self, RemoteError> {
        let storage = Arc::new(FileStorage::new(&config.storage_dir));
        Self::with_storage(config, storage)
    }

    /// Create state on an explicit storage backing.
    ///
    /// Both stores are loaded immediately. With an API configured, the
    /// catalog and auth share one client whose cookies are kept in the same
    /// storage, so a remote login survives a restart.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client for the configured API cannot be
    /// built.
    pub fn with_storage(
        config: PlugonConfig,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, RemoteError> {
        let api = config
            .api_base_url
            .clone()
            .map(|base_url| {
                ApiClient::persistent(base_url, Arc::clone(&storage), config.cookie_key.clone())
            })
            .transpose()?;
        let catalog = Catalog::with_api(&config, api.clone());
        let auth = AuthBackend::with_api(api);
        let session = SessionStore::open(Arc::clone(&storage), config.session_key.clone());
        let cart = CartStore::open(Arc::clone(&storage), config.cart_key.clone());

        tracing::debug!(
            catalog = catalog.kind(),
            auth = auth.kind(),
            authenticated = session.is_authenticated(),
            cart_lines = cart.len(),
            "Application state ready"
        );

        Ok(Self {
            config,
            storage,
            session,
            cart,
            catalog,
            auth,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &PlugonConfig {
        &self.config
    }

    #[must_use]
    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }

    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    pub const fn session_mut(&mut self) -> &mut SessionStore {
        &mut self.session
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn auth_backend(&self) -> &AuthBackend {
        &self.auth
    }

    /// Authentication service over the configured provider and the session.
    pub const fn auth(&mut self) -> AuthService<'_, AuthBackend> {
        AuthService::new(&self.auth, &mut self.session)
    }

    /// Shop service over the session, the cart and the configured catalog.
    pub const fn shop(&mut self) -> ShopService<'_, Catalog> {
        ShopService::new(&self.session, &mut self.cart, &self.catalog)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use plugon_core::ProductId;

    use super::*;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn test_demo_flow() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStorage::new());
        let mut state = AppState::with_storage(PlugonConfig::default(), storage.clone()).unwrap();
        assert_eq!(state.catalog().kind(), "static");
        assert_eq!(state.auth_backend().kind(), "demo");

        state
            .auth()
            .login("user@plugon.co.kr", &SecretString::from("user123".to_string()))
            .await
            .unwrap();
        state
            .shop()
            .add_to_cart(&ProductId::new("prod-001"), 2)
            .await
            .unwrap();

        let reopened = AppState::with_storage(PlugonConfig::default(), storage).unwrap();
        assert!(reopened.session().is_authenticated());
        assert_eq!(reopened.cart().item_count(), 2);
    }
}
