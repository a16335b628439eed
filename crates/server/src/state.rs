//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::auth::{AuthService, TokenStore};
use crate::store::{Catalog, MemoryStore, RepositoryError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration, the catalog and the in-memory store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    catalog: Catalog,
    store: MemoryStore,
    tokens: TokenStore,
}

impl AppState {
    /// Create application state around an already loaded catalog.
    #[must_use]
    pub fn new(config: ServerConfig, catalog: Catalog) -> Self {
        let tokens = TokenStore::new(config.token_ttl);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                store: MemoryStore::new(),
                tokens,
            }),
        }
    }

    /// Load the configured catalog and create the application state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog cannot be loaded.
    pub async fn load(config: ServerConfig) -> Result<Self, RepositoryError> {
        let catalog = Catalog::load(config.catalog_path.as_deref()).await?;
        Ok(Self::new(config, catalog))
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the marketplace catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the in-memory store.
    #[must_use]
    pub fn store(&self) -> &MemoryStore {
        &self.inner.store
    }

    /// Authentication service bound to this state.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(&self.inner.store, &self.inner.tokens)
    }
}
