//! Shopping actions gated on login.
//!
//! The cart store itself does not know about sessions; this is where
//! "anonymous users cannot shop" is enforced.

use thiserror::Error;
use tracing::{info, instrument};

use plugon_core::ProductId;

use crate::catalog::{CatalogError, ProductCatalog};
use crate::error::add_breadcrumb;
use crate::models::CartLine;
use crate::stores::{CartError, CartStore, SessionStore};

/// Where `buy_now` sends the user.
pub const CHECKOUT_PATH: &str = "/shop/checkout.html";

/// Product detail page; the product id goes in the `id` query parameter.
pub const PRODUCT_DETAIL_PATH: &str = "/shop/detail.html";

/// Errors that can occur when shopping.
#[derive(Debug, Error)]
pub enum ShopError {
    /// Nobody is logged in.
    #[error("login required")]
    LoginRequired,

    /// The cart refused the change.
    #[error(transparent)]
    Cart(#[from] CartError),
}

impl ShopError {
    /// Message suitable for showing to the user.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::LoginRequired => "장바구니를 이용하려면 로그인이 필요합니다.",
            Self::Cart(CartError::ProductNotFound(_)) => "상품 정보를 찾을 수 없습니다.",
            Self::Cart(CartError::Catalog(CatalogError::Unavailable(_))) => {
                "장바구니 추가 중 오류가 발생했습니다."
            }
        }
    }
}

/// Cart actions on behalf of the current session.
pub struct ShopService<'a, C> {
    session: &'a SessionStore,
    cart: &'a mut CartStore,
    catalog: &'a C,
}

impl<'a, C: ProductCatalog + Sync> ShopService<'a, C> {
    #[must_use]
    pub const fn new(session: &'a SessionStore, cart: &'a mut CartStore, catalog: &'a C) -> Self {
        Self {
            session,
            cart,
            catalog,
        }
    }

    /// Add a product to the cart for the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::LoginRequired` when anonymous, and
    /// `ShopError::Cart` when the product cannot be resolved. The cart is
    /// unchanged in both cases.
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub async fn add_to_cart(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<CartLine, ShopError> {
        if !self.session.can_access_cart() {
            return Err(ShopError::LoginRequired);
        }

        let line = self
            .cart
            .add_item(product_id, quantity, self.catalog)
            .await?;

        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product_id.as_str())]));
        info!(quantity = line.quantity, "Added to cart");
        Ok(line)
    }

    /// Add to cart and return the checkout path.
    ///
    /// # Errors
    ///
    /// Same as [`add_to_cart`](Self::add_to_cart).
    pub async fn buy_now(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<&'static str, ShopError> {
        if !self.session.can_place_order() {
            return Err(ShopError::LoginRequired);
        }

        self.add_to_cart(product_id, quantity).await?;
        Ok(CHECKOUT_PATH)
    }
}

/// Link to the detail page for `id`.
#[must_use]
pub fn product_url(id: &ProductId) -> String {
    format!("{PRODUCT_DETAIL_PATH}?id={}", urlencoding::encode(id.as_str()))
}

/// Confirmation shown after a successful add.
#[must_use]
pub fn added_message(line: &CartLine) -> String {
    format!("{}이(가) 장바구니에 추가되었습니다.", line.name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use plugon_core::{Email, Role, UserId};

    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::models::{Identity, keys};
    use crate::storage::MemoryStorage;

    fn stores(role: Option<Role>) -> (SessionStore, CartStore) {
        let storage = Arc::new(MemoryStorage::new());
        let mut session = SessionStore::open(storage.clone(), keys::SESSION);
        if let Some(role) = role {
            session.set_identity(Identity {
                id: UserId::new("1"),
                email: Email::parse("user@plugon.co.kr").unwrap(),
                first_name: "사용자".to_string(),
                last_name: "일반".to_string(),
                role,
                company_name: None,
                phone: None,
                created_at: None,
            });
        }
        let cart = CartStore::open(storage, keys::CART);
        (session, cart)
    }

    #[tokio::test]
    async fn test_anonymous_add_requires_login() {
        let (session, mut cart) = stores(None);
        let catalog = StaticCatalog::sample();

        let err = ShopService::new(&session, &mut cart, &catalog)
            .add_to_cart(&ProductId::new("prod-001"), 1)
            .await
            .unwrap_err();

        assert!(matches!(err, ShopError::LoginRequired));
        assert_eq!(err.user_message(), "장바구니를 이용하려면 로그인이 필요합니다.");
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_add_to_cart() {
        let (session, mut cart) = stores(Some(Role::Customer));
        let catalog = StaticCatalog::sample();

        let line = ShopService::new(&session, &mut cart, &catalog)
            .add_to_cart(&ProductId::new("prod-001"), 1)
            .await
            .unwrap();

        assert_eq!(
            added_message(&line),
            "PlugOn 스탠다드 패키지이(가) 장바구니에 추가되었습니다."
        );
        assert_eq!(cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_product_message() {
        let (session, mut cart) = stores(Some(Role::Customer));
        let catalog = StaticCatalog::sample();

        let err = ShopService::new(&session, &mut cart, &catalog)
            .add_to_cart(&ProductId::new("item9"), 1)
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "상품 정보를 찾을 수 없습니다.");
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_buy_now_returns_checkout() {
        let (session, mut cart) = stores(Some(Role::Branch));
        let catalog = StaticCatalog::sample();

        let path = ShopService::new(&session, &mut cart, &catalog)
            .buy_now(&ProductId::new("prod-003"), 2)
            .await
            .unwrap();

        assert_eq!(path, CHECKOUT_PATH);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_product_url() {
        assert_eq!(
            product_url(&ProductId::new("prod-002")),
            "/shop/detail.html?id=prod-002"
        );
        assert_eq!(
            product_url(&ProductId::new("a b&c")),
            "/shop/detail.html?id=a%20b%26c"
        );
    }
}
