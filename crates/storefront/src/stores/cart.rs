//! The cart store: what is in the shopping cart.
//!
//! Lines are kept in insertion order, one per product id, with quantities in
//! `[1, 99]`. Every mutation writes the full line list through to storage and
//! then notifies listeners with the new item count.
//!
//! The store does not know who is logged in. Gating cart access on login is
//! the caller's job (see `ShopService`).

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error, warn};

use plugon_core::{Price, ProductId};

use crate::catalog::{CatalogError, ProductCatalog};
use crate::models::cart::{MAX_QUANTITY, clamp_quantity};
use crate::models::{CartLine, OrderSummary, Product};
use crate::storage::KeyValueStore;

use super::observer::{Observers, SubscriptionId};

/// Errors that can occur when adding to the cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// The catalog has no product with this id.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// The catalog could not be queried.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Cart change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEvent {
    /// The lines changed; `item_count` is the new sum of quantities.
    Changed { item_count: u32 },
}

/// Authoritative holder of the cart contents.
#[derive(Debug)]
pub struct CartStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    lines: Vec<CartLine>,
    observers: Observers<CartEvent>,
}

impl CartStore {
    /// Create an empty store without reading storage.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            lines: Vec::new(),
            observers: Observers::new(),
        }
    }

    /// Create a store and immediately [`load`](Self::load) it.
    #[must_use]
    pub fn open(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let mut store = Self::new(storage, key);
        store.load();
        store
    }

    /// Replace the in-memory lines with the persisted ones.
    ///
    /// A document that is not a JSON array resets the cart to empty. Inside
    /// an array, lines that fail to decode or lack a required field are
    /// dropped, duplicate product ids keep their first line, and quantities
    /// above the maximum are clamped. Nothing is reported to the caller.
    pub fn load(&mut self) {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.lines.clear();
                return;
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read stored cart");
                self.lines.clear();
                return;
            }
        };

        let values = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(values) => values,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding corrupt stored cart");
                self.lines.clear();
                return;
            }
        };

        let mut lines: Vec<CartLine> = Vec::with_capacity(values.len());
        for value in values {
            let mut line = match serde_json::from_value::<CartLine>(value) {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "Dropping undecodable cart line");
                    continue;
                }
            };

            if !line.is_complete() {
                warn!(product_id = %line.id, "Dropping incomplete cart line");
                continue;
            }

            if lines.iter().any(|existing| existing.id == line.id) {
                warn!(product_id = %line.id, "Dropping duplicate cart line");
                continue;
            }

            line.quantity = line.quantity.min(MAX_QUANTITY);
            lines.push(line);
        }

        debug!(lines = lines.len(), "Loaded cart");
        self.lines = lines;
    }

    /// Resolve `product_id` through `catalog` and add `quantity` of it.
    ///
    /// An existing line has `quantity` added to it; the sum is clamped to
    /// `[1, 99]`. A new line is appended with the clamped quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if the catalog has no such
    /// product and `CartError::Catalog` if the catalog cannot be reached. The
    /// cart is unchanged in both cases.
    pub async fn add_item<C>(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
        catalog: &C,
    ) -> Result<CartLine, CartError>
    where
        C: ProductCatalog + ?Sized,
    {
        let product = catalog
            .find_product(product_id)
            .await?
            .ok_or_else(|| CartError::ProductNotFound(product_id.clone()))?;

        Ok(self.add_product(product, quantity))
    }

    /// Add an already-resolved product and return the resulting line. See
    /// [`add_item`](Self::add_item).
    pub fn add_product(&mut self, product: Product, quantity: u32) -> CartLine {
        let line = match self.lines.iter_mut().find(|line| line.id == product.id) {
            Some(line) => {
                let combined = i64::from(line.quantity) + i64::from(quantity);
                line.quantity = clamp_quantity(combined);
                debug!(product_id = %line.id, quantity = line.quantity, "Merged into cart line");
                line.clone()
            }
            None => {
                let line = CartLine::from_product(product, quantity, Utc::now());
                debug!(product_id = %line.id, quantity = line.quantity, "Appended cart line");
                self.lines.push(line.clone());
                line
            }
        };

        self.commit();
        line
    }

    /// Remove the line for `product_id`. Returns `false` if there was none.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let Some(index) = self.position(product_id) else {
            return false;
        };

        let removed = self.lines.remove(index);
        debug!(product_id = %removed.id, "Removed cart line");
        self.commit();
        true
    }

    /// Set the quantity of an existing line.
    ///
    /// `new_quantity <= 0` removes the line. Other values are clamped to
    /// `[1, 99]`. Returns `false` if there is no line for `product_id`.
    pub fn set_quantity(&mut self, product_id: &ProductId, new_quantity: i64) -> bool {
        if new_quantity <= 0 {
            return self.remove_item(product_id);
        }

        let Some(line) = self.lines.iter_mut().find(|line| &line.id == product_id) else {
            return false;
        };

        line.quantity = clamp_quantity(new_quantity);
        debug!(product_id = %line.id, quantity = line.quantity, "Updated cart line quantity");
        self.commit();
        true
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
        debug!("Cleared cart");
        self.commit();
    }

    /// Drop lines missing a required field (id, name, positive price,
    /// positive quantity), persist, and return the remaining lines.
    pub fn validate(&mut self) -> Vec<CartLine> {
        let before = self.lines.len();
        self.lines.retain(CartLine::is_complete);
        let dropped = before - self.lines.len();
        if dropped > 0 {
            warn!(dropped, "Removed invalid cart lines");
        }
        self.commit();
        self.snapshot()
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities (not the number of lines).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Subtotal, shipping, discount and total for checkout.
    #[must_use]
    pub fn order_summary(&self) -> OrderSummary {
        OrderSummary::from_subtotal(self.total(), self.item_count())
    }

    /// An independent copy of the lines in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CartLine> {
        self.lines.clone()
    }

    /// Borrow the line for `product_id`.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.id == product_id)
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Register a listener for cart changes.
    pub fn subscribe(
        &mut self,
        listener: impl Fn(&CartEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(listener)
    }

    /// Remove a listener registered with [`subscribe`](Self::subscribe).
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.lines.iter().position(|line| &line.id == product_id)
    }

    /// Persist, then notify listeners.
    fn commit(&self) {
        self.persist();
        self.observers.notify(&CartEvent::Changed {
            item_count: self.item_count(),
        });
    }

    /// Write the in-memory lines through to storage.
    ///
    /// Failures are logged; memory stays authoritative and the next mutation
    /// rewrites the document.
    fn persist(&self) {
        match serde_json::to_string(&self.lines) {
            Ok(json) => {
                if let Err(e) = self.storage.set(&self.key, &json) {
                    error!(key = %self.key, error = %e, "Failed to persist cart");
                }
            }
            Err(e) => error!(error = %e, "Failed to encode cart"),
        }
    }
}
