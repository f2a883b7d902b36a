//! Application state shared across handlers.

use std::sync::Arc;

use crate::commerce::{CommerceApi, CommerceClient};
use crate::config::StorefrontConfig;
use crate::services::OrderViews;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration, the commerce backend and the live order views.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    commerce: Arc<dyn CommerceApi>,
    order_views: OrderViews,
}

impl AppState {
    /// Create application state backed by the real commerce backend.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let commerce = Arc::new(CommerceClient::new(&config.commerce));
        Self::with_commerce(config, commerce)
    }

    /// Create application state over any [`CommerceApi`] implementation.
    #[must_use]
    pub fn with_commerce(config: StorefrontConfig, commerce: Arc<dyn CommerceApi>) -> Self {
        let order_views = OrderViews::new(Arc::clone(&commerce));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                commerce,
                order_views,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the commerce backend.
    #[must_use]
    pub fn commerce(&self) -> &dyn CommerceApi {
        self.inner.commerce.as_ref()
    }

    /// Get the registry of live order views.
    #[must_use]
    pub fn order_views(&self) -> &OrderViews {
        &self.inner.order_views
    }
}
