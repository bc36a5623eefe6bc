//! Cart line and order summary types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use plugon_core::{Price, ProductId};

use super::product::{Category, Product};

/// Smallest quantity a cart line may hold.
pub const MIN_QUANTITY: u32 = 1;

/// Largest quantity a cart line may hold.
pub const MAX_QUANTITY: u32 = 99;

/// Orders at or above this subtotal ship free.
pub const FREE_SHIPPING_THRESHOLD: Price = Price::won(50_000);

/// Flat shipping fee below the free-shipping threshold.
pub const SHIPPING_FEE: Price = Price::won(3_000);

/// Clamp a requested quantity into `[MIN_QUANTITY, MAX_QUANTITY]`.
#[must_use]
pub fn clamp_quantity(quantity: i64) -> u32 {
    let clamped = quantity.clamp(i64::from(MIN_QUANTITY), i64::from(MAX_QUANTITY));
    u32::try_from(clamped).unwrap_or(MAX_QUANTITY)
}

/// One product entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product id; unique within a cart.
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price.
    pub price: Price,
    pub quantity: u32,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Build a new line for `product` with a clamped quantity.
    #[must_use]
    pub fn from_product(product: Product, quantity: u32, added_at: DateTime<Utc>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            quantity: clamp_quantity(i64::from(quantity)),
            category: product.category,
            image_url: product.image_url,
            added_at,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }

    /// Whether every required field is present: id, name, a positive price
    /// and a positive quantity.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.id.is_empty() && !self.name.is_empty() && !self.price.is_zero() && self.quantity > 0
    }
}

/// Checkout totals derived from the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub subtotal: Price,
    pub shipping: Price,
    /// Always zero; coupons are not implemented.
    pub discount: Price,
    pub total: Price,
    pub item_count: u32,
}

impl OrderSummary {
    /// Compute the summary for a cart subtotal.
    #[must_use]
    pub fn from_subtotal(subtotal: Price, item_count: u32) -> Self {
        let shipping = shipping_for(subtotal);
        let discount = Price::ZERO;
        Self {
            subtotal,
            shipping,
            discount,
            total: subtotal.saturating_add(shipping).saturating_sub(discount),
            item_count,
        }
    }
}

/// Shipping fee for a subtotal: free from 50,000 won, otherwise 3,000 won.
#[must_use]
pub fn shipping_for(subtotal: Price) -> Price {
    if subtotal >= FREE_SHIPPING_THRESHOLD {
        Price::ZERO
    } else {
        SHIPPING_FEE
    }
}
