//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::services::{Celebration, ConfettiCelebration, LocalOrderGateway, OrderGateway};
use crate::supabase::{ArrangementsClient, ArrangementsError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the catalog and the external collaborators.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    arrangements: Option<ArrangementsClient>,
    orders: Arc<dyn OrderGateway>,
    celebration: Arc<dyn Celebration>,
}

impl AppState {
    /// Create application state with the local order gateway and confetti.
    ///
    /// # Errors
    ///
    /// Returns an error if the arrangements client cannot be built from the
    /// configured project URL.
    pub fn new(config: StorefrontConfig) -> Result<Self, ArrangementsError> {
        Self::builder(config).build()
    }

    /// Start building application state with custom collaborators.
    #[must_use]
    pub fn builder(config: StorefrontConfig) -> AppStateBuilder {
        AppStateBuilder {
            config,
            catalog: Catalog::default(),
            orders: Arc::new(LocalOrderGateway),
            celebration: Arc::new(ConfettiCelebration),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the arrangement catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get the hosted table client, if configured.
    #[must_use]
    pub fn arrangements(&self) -> Option<&ArrangementsClient> {
        self.inner.arrangements.as_ref()
    }

    /// Get a reference to the order gateway.
    #[must_use]
    pub fn orders(&self) -> &dyn OrderGateway {
        self.inner.orders.as_ref()
    }

    /// Get a reference to the order celebration.
    #[must_use]
    pub fn celebration(&self) -> &dyn Celebration {
        self.inner.celebration.as_ref()
    }
}

/// Builder for [`AppState`].
pub struct AppStateBuilder {
    config: StorefrontConfig,
    catalog: Catalog,
    orders: Arc<dyn OrderGateway>,
    celebration: Arc<dyn Celebration>,
}

impl AppStateBuilder {
    /// Replace the built-in catalog.
    #[must_use]
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the order gateway.
    #[must_use]
    pub fn orders(mut self, orders: Arc<dyn OrderGateway>) -> Self {
        self.orders = orders;
        self
    }

    /// Replace the order celebration.
    #[must_use]
    pub fn celebration(mut self, celebration: Arc<dyn Celebration>) -> Self {
        self.celebration = celebration;
        self
    }

    /// Build the state.
    ///
    /// # Errors
    ///
    /// Returns an error if the arrangements client cannot be built.
    pub fn build(self) -> Result<AppState, ArrangementsError> {
        let arrangements = self
            .config
            .supabase
            .as_ref()
            .map(ArrangementsClient::new)
            .transpose()?;

        Ok(AppState {
            inner: Arc::new(AppStateInner {
                config: self.config,
                catalog: self.catalog,
                arrangements,
                orders: self.orders,
                celebration: self.celebration,
            }),
        })
    }
}
