//! Remote catalog and auth against the mock PlugOn API.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use plugon_core::{ProductId, Role};
use plugon_integration_tests::{BROKEN_PRODUCT, MOCK_EMAIL, MOCK_PASSWORD, MockApi, identity};
use plugon_storefront::catalog::{Catalog, CatalogError, ProductCatalog};
use plugon_storefront::config::{CatalogSource, PlugonConfig};
use plugon_storefront::models::keys;
use plugon_storefront::remote::{ApiClient, RemoteError};
use plugon_storefront::services::auth::{AuthError, AuthService, RemoteAuth, SyncOutcome};
use plugon_storefront::state::AppState;
use plugon_storefront::storage::{KeyValueStore, MemoryStorage};
use plugon_storefront::stores::{CartError, CartStore, SessionStore};
use secrecy::SecretString;

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

fn session() -> SessionStore {
    SessionStore::open(Arc::new(MemoryStorage::new()), keys::SESSION)
}

#[tokio::test]
async fn remote_catalog_finds_and_caches() {
    let api = MockApi::start().await;
    let catalog = Catalog::remote(api.base_url(), Duration::from_secs(60)).unwrap();
    let id = ProductId::new("prod-001");

    let product = catalog.find_product(&id).await.unwrap().unwrap();
    assert_eq!(product.name, "PlugOn 스탠다드 패키지");
    assert_eq!(product.stock, Some(100));

    catalog.find_product(&id).await.unwrap();
    assert_eq!(api.product_hits(), 1);
}

#[tokio::test]
async fn remote_catalog_misses_are_not_found() {
    let api = MockApi::start().await;
    let catalog = Catalog::remote(api.base_url(), Duration::from_secs(60)).unwrap();

    assert!(catalog
        .find_product(&ProductId::new("item9"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn remote_catalog_server_error_is_unavailable() {
    let api = MockApi::start().await;
    let catalog = Catalog::remote(api.base_url(), Duration::from_secs(60)).unwrap();
    let mut cart = CartStore::open(Arc::new(MemoryStorage::new()), keys::CART);

    let err = cart
        .add_item(&ProductId::new(BROKEN_PRODUCT), 1, &catalog)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CartError::Catalog(CatalogError::Unavailable(RemoteError::Server(status)))
            if status.as_u16() == 500
    ));
    assert!(cart.is_empty());
}

#[tokio::test]
async fn unreachable_catalog_leaves_cart_unchanged() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = url::Url::parse(&format!("http://{addr}")).unwrap();
    let catalog = Catalog::remote(base, Duration::from_secs(60)).unwrap();
    let mut cart = CartStore::open(Arc::new(MemoryStorage::new()), keys::CART);

    let err = cart
        .add_item(&ProductId::new("prod-001"), 1, &catalog)
        .await
        .unwrap_err();

    assert!(matches!(err, CartError::Catalog(CatalogError::Unavailable(_))));
    assert!(cart.is_empty());
}

#[tokio::test]
async fn catalog_from_config_uses_remote_when_configured() {
    let api = MockApi::start().await;
    let config = PlugonConfig {
        api_base_url: Some(api.base_url()),
        ..PlugonConfig::default()
    };
    assert_eq!(Catalog::from_config(&config).unwrap().kind(), "remote");

    let forced_static = PlugonConfig {
        catalog_source: CatalogSource::Static,
        ..config
    };
    assert_eq!(Catalog::from_config(&forced_static).unwrap().kind(), "static");
}

#[tokio::test]
async fn remote_login_sync_logout() {
    let api = MockApi::start().await;
    let auth = RemoteAuth::new(ApiClient::new(api.base_url()).unwrap());
    let mut session = session();

    let identity = AuthService::new(&auth, &mut session)
        .login(MOCK_EMAIL, &secret(MOCK_PASSWORD))
        .await
        .unwrap();
    assert_eq!(identity.role, Role::SuperAdmin);
    assert!(session.has_admin_access());

    assert_eq!(
        AuthService::new(&auth, &mut session).sync().await,
        SyncOutcome::Refreshed
    );
    assert_eq!(session.current_identity(), Some(&identity));

    let outcome = AuthService::new(&auth, &mut session).logout().await;
    assert!(outcome.remote_ok);
    assert_eq!(outcome.message.as_deref(), Some("로그아웃되었습니다."));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn remote_login_rejection_carries_server_message() {
    let api = MockApi::start().await;
    let auth = RemoteAuth::new(ApiClient::new(api.base_url()).unwrap());
    let mut session = session();

    let err = AuthService::new(&auth, &mut session)
        .login(MOCK_EMAIL, &secret("wrong"))
        .await
        .unwrap_err();

    match err {
        AuthError::Rejected(message) => {
            assert_eq!(message, "이메일 또는 비밀번호가 올바르지 않습니다.");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn stale_local_session_is_cleared_by_sync() {
    let api = MockApi::start().await;
    let auth = RemoteAuth::new(ApiClient::new(api.base_url()).unwrap());
    let mut session = session();
    session.set_identity(identity(Role::Branch));

    assert_eq!(
        AuthService::new(&auth, &mut session).sync().await,
        SyncOutcome::Cleared
    );
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn remote_login_survives_restart() {
    let api = MockApi::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = PlugonConfig {
        api_base_url: Some(api.base_url()),
        storage_dir: dir.path().to_path_buf(),
        ..PlugonConfig::default()
    };

    {
        let mut first_run = AppState::from_config(config.clone()).unwrap();
        first_run
            .auth()
            .login(MOCK_EMAIL, &secret(MOCK_PASSWORD))
            .await
            .unwrap();
        assert!(first_run.storage().get(keys::COOKIES).unwrap().is_some());
    }

    let mut second_run = AppState::from_config(config.clone()).unwrap();
    assert!(second_run.session().is_authenticated());
    assert_eq!(second_run.auth().sync().await, SyncOutcome::Refreshed);
    assert!(second_run.session().has_admin_access());

    let outcome = second_run.auth().logout().await;
    assert!(outcome.remote_ok);
    assert_eq!(second_run.storage().get(keys::COOKIES).unwrap(), None);
    drop(second_run);

    let mut third_run = AppState::from_config(config).unwrap();
    assert!(!third_run.session().is_authenticated());
    assert_eq!(third_run.auth().sync().await, SyncOutcome::Skipped);
}
