//! Cart invariants and shopping flows on the sample catalog.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use plugon_core::{Price, ProductId, Role};
use plugon_integration_tests::identity;
use plugon_storefront::catalog::StaticCatalog;
use plugon_storefront::models::keys;
use plugon_storefront::services::shop::{ShopError, ShopService};
use plugon_storefront::storage::MemoryStorage;
use plugon_storefront::stores::{CartStore, SessionStore};

fn cart() -> CartStore {
    CartStore::open(Arc::new(MemoryStorage::new()), keys::CART)
}

fn assert_invariants(cart: &CartStore) {
    let snapshot = cart.snapshot();
    let mut ids: Vec<_> = snapshot.iter().map(|line| line.id.clone()).collect();
    ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    ids.dedup();
    assert_eq!(ids.len(), snapshot.len(), "duplicate product ids");

    for line in &snapshot {
        assert!((1..=99).contains(&line.quantity), "quantity out of range");
    }

    let total: Price = snapshot.iter().map(|line| line.line_total()).sum();
    let count: u32 = snapshot.iter().map(|line| line.quantity).sum();
    assert_eq!(cart.total(), total);
    assert_eq!(cart.item_count(), count);
}

#[tokio::test]
async fn invariants_hold_under_mixed_operations() {
    let catalog = StaticCatalog::sample();
    let mut cart = cart();
    let ids = ["prod-001", "prod-002", "prod-003", "prod-004", "prod-005"];

    for (step, id) in ids.iter().cycle().take(40).enumerate() {
        let id = ProductId::new(*id);
        match step % 5 {
            0 | 1 => {
                cart.add_item(&id, u32::try_from(step * 7).unwrap(), &catalog)
                    .await
                    .unwrap();
            }
            2 => {
                cart.set_quantity(&id, i64::try_from(step).unwrap() * 13 - 100);
            }
            3 => {
                cart.remove_item(&id);
            }
            _ => {
                cart.add_item(&id, 98, &catalog).await.unwrap();
            }
        }
        assert_invariants(&cart);
    }
}

#[tokio::test]
async fn add_to_existing_line_saturates_at_99() {
    let catalog = StaticCatalog::sample();
    let mut cart = cart();
    let id = ProductId::new("prod-002");

    for (existing, added) in [(1, 1), (50, 49), (50, 50), (99, 1), (10, 200)] {
        cart.clear();
        cart.add_item(&id, existing, &catalog).await.unwrap();
        let line = cart.add_item(&id, added, &catalog).await.unwrap();
        assert_eq!(line.quantity, (existing + added).min(99));
        assert_eq!(cart.len(), 1);
    }
}

#[tokio::test]
async fn set_quantity_zero_is_remove() {
    let catalog = StaticCatalog::sample();
    let id = ProductId::new("prod-004");

    let mut by_set = cart();
    let mut by_remove = cart();
    for store in [&mut by_set, &mut by_remove] {
        store.add_item(&id, 3, &catalog).await.unwrap();
        store
            .add_item(&ProductId::new("prod-001"), 1, &catalog)
            .await
            .unwrap();
    }

    assert!(by_set.set_quantity(&id, 0));
    assert!(by_remove.remove_item(&id));
    assert_eq!(line_view(&by_set), line_view(&by_remove));
    assert_eq!(by_set.total(), by_remove.total());
    assert_eq!(by_set.item_count(), by_remove.item_count());
}

/// Cart contents without the insertion timestamps.
fn line_view(cart: &CartStore) -> Vec<(ProductId, u32, Price)> {
    cart.snapshot()
        .into_iter()
        .map(|line| (line.id, line.quantity, line.price))
        .collect()
}

#[tokio::test]
async fn standard_package_twice_ships_free() {
    let catalog = StaticCatalog::sample();
    let mut cart = cart();
    let id = ProductId::new("prod-001");

    cart.add_item(&id, 1, &catalog).await.unwrap();
    cart.add_item(&id, 1, &catalog).await.unwrap();

    let lines = cart.snapshot();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 2);

    let summary = cart.order_summary();
    assert_eq!(summary.subtotal, Price::won(198_000));
    assert_eq!(summary.shipping, Price::ZERO);
    assert_eq!(summary.discount, Price::ZERO);
    assert_eq!(summary.total, Price::won(198_000));
}

#[tokio::test]
async fn anonymous_shopper_is_sent_to_login() {
    let storage = Arc::new(MemoryStorage::new());
    let session = SessionStore::open(storage.clone(), keys::SESSION);
    let mut cart = CartStore::open(storage, keys::CART);
    let catalog = StaticCatalog::sample();

    let err = ShopService::new(&session, &mut cart, &catalog)
        .add_to_cart(&ProductId::new("prod-001"), 1)
        .await
        .unwrap_err();

    assert!(matches!(err, ShopError::LoginRequired));
    assert!(cart.is_empty());
    assert_eq!(cart.item_count(), 0);
}

#[test]
fn role_access_matrix() {
    let cases = [
        (Role::SuperAdmin, true, true),
        (Role::Headquarters, true, true),
        (Role::Branch, true, true),
        (Role::District, false, true),
        (Role::SalesPoint, false, true),
        (Role::Customer, false, false),
    ];

    for (role, task, admin) in cases {
        let mut session = SessionStore::new(Arc::new(MemoryStorage::new()), keys::SESSION);
        session.set_identity(identity(role.clone()));
        assert_eq!(session.has_task_access(), task, "task access for {role}");
        assert_eq!(session.has_admin_access(), admin, "admin access for {role}");
    }
}
