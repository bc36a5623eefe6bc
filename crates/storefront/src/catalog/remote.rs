//! Remote product catalog backed by the PlugOn API.

use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use tracing::{debug, instrument, warn};

use plugon_core::ProductId;

use crate::models::Product;
use crate::remote::{ApiClient, RemoteError};

use super::{CatalogError, ProductCatalog};

/// Looks products up with `GET /api/products/{id}`.
///
/// Found products are cached for the configured TTL. Misses are not cached,
/// so a product added upstream becomes visible on the next lookup. A 5xx is an
/// outage, not a miss, and surfaces as [`CatalogError::Unavailable`].
#[derive(Debug, Clone)]
pub struct RemoteCatalog {
    api: ApiClient,
    cache: Cache<ProductId, Product>,
}

impl RemoteCatalog {
    /// Create a remote catalog with the given cache TTL.
    #[must_use]
    pub fn new(api: ApiClient, cache_ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(cache_ttl)
            .build();

        Self { api, cache }
    }

    /// Drop every cached product.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl ProductCatalog for RemoteCatalog {
    #[instrument(skip(self, id), fields(product_id = %id))]
    async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        if let Some(product) = self.cache.get(id).await {
            debug!("Product cache hit");
            return Ok(Some(product));
        }

        let path = format!("api/products/{}", urlencoding::encode(id.as_str()));
        let response = self.api.get(&path).await?;

        if response.status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if response.status.is_server_error() {
            warn!(status = %response.status, "Product lookup failed on the server");
            return Err(CatalogError::Unavailable(RemoteError::Server(response.status)));
        }

        if !response.status.is_success() {
            warn!(status = %response.status, "Product lookup returned non-success status");
            return Ok(None);
        }

        let product = response
            .envelope
            .filter(|envelope| envelope.success)
            .and_then(|envelope| envelope.product);

        if let Some(product) = &product {
            self.cache.insert(id.clone(), product.clone()).await;
        }

        Ok(product)
    }
}
