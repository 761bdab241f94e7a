//! Service container shared across the UI layer.

use std::sync::Arc;

use stayhub_core::Identity;

use crate::api::HttpComparisonApi;
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::notify::Notifier;
use crate::services::comparison::ComparisonStore;

/// Comparison store wired to the HTTP API and a shared notifier.
pub type StorefrontComparisonStore = ComparisonStore<HttpComparisonApi, Arc<dyn Notifier>>;

/// Services constructed once at startup and passed to whatever needs them.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct Services {
    inner: Arc<ServicesInner>,
}

struct ServicesInner {
    config: StorefrontConfig,
    api: HttpComparisonApi,
    comparison: StorefrontComparisonStore,
}

impl Services {
    /// Create the service container.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `notifier` - Where user-facing notices go
    /// * `identity` - The visitor's identity at startup
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built.
    pub fn new(
        config: StorefrontConfig,
        notifier: Arc<dyn Notifier>,
        identity: Identity,
    ) -> Result<Self, AppError> {
        let api = HttpComparisonApi::new(&config.api)?;
        let comparison =
            ComparisonStore::new(api.clone(), notifier, identity, config.api.request_timeout);

        Ok(Self {
            inner: Arc::new(ServicesInner {
                config,
                api,
                comparison,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the marketplace API client.
    #[must_use]
    pub fn api(&self) -> &HttpComparisonApi {
        &self.inner.api
    }

    /// Get a reference to the comparison store.
    #[must_use]
    pub fn comparison(&self) -> &StorefrontComparisonStore {
        &self.inner.comparison
    }
}
