//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ApiConfig;
use crate::db::Storage;
use crate::services::SeedScope;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration and the storage backend.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    storage: Storage,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration
    /// * `storage` - Repositories for the configured backend
    #[must_use]
    pub fn new(config: ApiConfig, storage: Storage) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, storage }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the storage backend.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.inner.storage
    }

    /// Scope of the seeding guard applied when projects are created.
    #[must_use]
    pub fn seed_scope(&self) -> SeedScope {
        self.inner.config.seed_scope
    }
}
