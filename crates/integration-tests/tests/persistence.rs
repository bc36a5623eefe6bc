//! File-backed persistence: round-trips and corrupt-data recovery.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use plugon_core::{ProductId, Role};
use plugon_integration_tests::identity;
use plugon_storefront::catalog::StaticCatalog;
use plugon_storefront::config::PlugonConfig;
use plugon_storefront::models::keys;
use plugon_storefront::state::AppState;
use plugon_storefront::storage::{FileStorage, KeyValueStore};
use plugon_storefront::stores::{CartStore, SessionStore};
use secrecy::SecretString;

#[tokio::test]
async fn cart_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path()));
    let catalog = StaticCatalog::sample();

    let mut cart = CartStore::open(storage.clone(), keys::CART);
    cart.add_item(&ProductId::new("prod-003"), 2, &catalog)
        .await
        .unwrap();
    cart.add_item(&ProductId::new("prod-005"), 1, &catalog)
        .await
        .unwrap();

    let reopened = CartStore::open(Arc::new(FileStorage::new(dir.path())), keys::CART);
    assert_eq!(reopened.snapshot(), cart.snapshot());
    assert_eq!(reopened.total(), cart.total());
}

#[test]
fn session_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path()));

    let mut session = SessionStore::open(storage, keys::SESSION);
    session.set_identity(identity(Role::SalesPoint));

    let reopened = SessionStore::open(Arc::new(FileStorage::new(dir.path())), keys::SESSION);
    assert_eq!(reopened.current_identity(), session.current_identity());
    assert!(reopened.has_admin_access());
}

#[test]
fn corrupt_documents_reset_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path()));
    storage.set(keys::CART, "[{\"id\": \"prod-001\", ").unwrap();
    storage.set(keys::SESSION, "not json at all").unwrap();

    let cart = CartStore::open(storage.clone(), keys::CART);
    let session = SessionStore::open(storage.clone(), keys::SESSION);

    assert!(cart.is_empty());
    assert!(!session.is_authenticated());
    assert_eq!(storage.get(keys::SESSION).unwrap(), None);
}

#[test]
fn cart_object_instead_of_array_resets() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path()));
    storage
        .set(keys::CART, r#"{"id":"prod-001","name":"A","price":1,"quantity":1}"#)
        .unwrap();

    assert!(CartStore::open(storage, keys::CART).is_empty());
}

#[tokio::test]
async fn app_state_restores_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let config = PlugonConfig {
        storage_dir: dir.path().to_path_buf(),
        ..PlugonConfig::default()
    };

    {
        let mut state = AppState::from_config(config.clone()).unwrap();
        state
            .auth()
            .login("user@plugon.co.kr", &SecretString::from("user123".to_string()))
            .await
            .unwrap();
        state
            .shop()
            .add_to_cart(&ProductId::new("prod-002"), 3)
            .await
            .unwrap();
    }

    let mut state = AppState::from_config(config).unwrap();
    assert_eq!(state.session().role(), Some(&Role::Customer));
    assert_eq!(state.cart().item_count(), 3);

    state.auth().logout().await;
    let state = AppState::from_config(state.config().clone()).unwrap();
    assert!(!state.session().is_authenticated());
    assert_eq!(state.cart().item_count(), 3);
}
