//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ThriftboxConfig;
use crate::error::AppError;
use crate::models::Store;
use crate::services::StoreDirectory;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
/// Repositories are built from [`AppState::pool`] per request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ThriftboxConfig,
    pool: PgPool,
    stores: StoreDirectory,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ThriftboxConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                stores: StoreDirectory::new(),
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ThriftboxConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the cached store directory.
    #[must_use]
    pub fn stores(&self) -> &StoreDirectory {
        &self.inner.stores
    }

    /// Resolve the active store behind a `/s/{slug}` path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown or inactive slug.
    pub async fn store_by_slug(&self, slug: &str) -> Result<Store, AppError> {
        self.stores()
            .resolve(self.pool(), slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("store '{slug}'")))
    }
}
