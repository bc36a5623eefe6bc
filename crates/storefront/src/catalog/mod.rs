//! Product lookup collaborators.
//!
//! The cart resolves product ids through a [`ProductCatalog`]. Two backings
//! exist:
//!
//! - [`StaticCatalog`] - the built-in sample products (demo mode)
//! - [`RemoteCatalog`] - `GET /api/products/{id}` on the PlugOn API, cached
//!   in memory via `moka`
//!
//! [`Catalog`] wraps both and is chosen once from configuration. There is no
//! silent fallback from remote to static: a remote outage surfaces as
//! [`CatalogError::Unavailable`].

mod remote;
mod sample;

pub use remote::RemoteCatalog;
pub use sample::StaticCatalog;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use plugon_core::ProductId;

use crate::config::{CatalogSource, PlugonConfig};
use crate::models::Product;
use crate::remote::{ApiClient, RemoteError};

/// Errors that can occur when resolving a product.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The remote catalog could not be reached.
    #[error("product catalog unavailable: {0}")]
    Unavailable(#[from] RemoteError),
}

/// Resolves product ids to product descriptors.
pub trait ProductCatalog {
    /// Look up a product. `Ok(None)` means the catalog has no such product.
    fn find_product(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<Option<Product>, CatalogError>> + Send;
}

/// The configured catalog backing.
#[derive(Debug, Clone)]
pub enum Catalog {
    Static(StaticCatalog),
    Remote(RemoteCatalog),
}

impl Catalog {
    /// Choose a backing from configuration.
    ///
    /// `auto` uses the remote catalog when an API base URL is configured and
    /// the sample table otherwise.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the HTTP client cannot be built.
    pub fn from_config(config: &PlugonConfig) -> Result<Self, RemoteError> {
        let api = config.api_base_url.clone().map(ApiClient::new).transpose()?;
        Ok(Self::with_api(config, api))
    }

    /// Choose a backing from configuration, reusing `api` for the remote one.
    #[must_use]
    pub fn with_api(config: &PlugonConfig, api: Option<ApiClient>) -> Self {
        match (config.catalog_source, api) {
            (CatalogSource::Static, _) | (CatalogSource::Auto, None) => {
                Self::Static(StaticCatalog::sample())
            }
            (CatalogSource::Auto | CatalogSource::Remote, Some(api)) => {
                Self::Remote(RemoteCatalog::new(api, config.catalog_cache_ttl))
            }
            (CatalogSource::Remote, None) => {
                tracing::warn!("Remote catalog requested without an API base URL; using sample products");
                Self::Static(StaticCatalog::sample())
            }
        }
    }

    /// Build a remote catalog for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the HTTP client cannot be built.
    pub fn remote(base_url: Url, cache_ttl: Duration) -> Result<Self, RemoteError> {
        let api = ApiClient::new(base_url)?;
        Ok(Self::Remote(RemoteCatalog::new(api, cache_ttl)))
    }

    /// Short name of the backing, for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Static(_) => "static",
            Self::Remote(_) => "remote",
        }
    }
}

impl ProductCatalog for Catalog {
    async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        match self {
            Self::Static(catalog) => catalog.find_product(id).await,
            Self::Remote(catalog) => catalog.find_product(id).await,
        }
    }
}
