//! Slug to store resolution, cached.
//!
//! Every customer request starts by resolving `/s/{slug}`. Stores change
//! rarely, so lookups are cached for 5 minutes. Misses are not cached, so a
//! newly created store is reachable immediately.
//!
//! Deactivation happens outside this process (an `UPDATE` on
//! `thriftbox.store`), so a store switched off in the database keeps serving
//! customers until its cache entry expires, at most 5 minutes. Inactive stores
//! are never admitted to the cache.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, instrument};

use crate::db::{RepositoryError, StoreRepository};
use crate::models::Store;

/// Cached directory of active stores keyed by slug.
#[derive(Clone)]
pub struct StoreDirectory {
    cache: Arc<Cache<String, Store>>,
}

impl Default for StoreDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreDirectory {
    #[must_use]
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Resolve an active store by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the lookup query fails.
    #[instrument(skip(self, pool))]
    pub async fn resolve(&self, pool: &PgPool, slug: &str) -> Result<Option<Store>, RepositoryError> {
        if let Some(store) = self.cache.get(slug).await {
            debug!("Cache hit for store");
            return Ok(Some(store));
        }

        let store = StoreRepository::new(pool).get_by_slug(slug).await?;
        if let Some(store) = &store {
            self.remember(store.clone()).await;
        }
        Ok(store)
    }

    /// Put a store in the cache. Inactive stores are dropped.
    pub async fn remember(&self, store: Store) {
        if !store.is_active {
            self.cache.invalidate(&store.slug).await;
            return;
        }
        self.cache.insert(store.slug.clone(), store).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use thriftbox_core::{StoreId, UserId};

    use super::*;

    fn store(slug: &str) -> Store {
        Store {
            id: StoreId::new(1),
            user_id: UserId::new(1),
            slug: slug.to_string(),
            name: "Porch Sale".to_string(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_cached_store_resolves_without_database() {
        let directory = StoreDirectory::new();
        directory.remember(store("porch-sale")).await;

        // Never connects: the cached entry answers first
        let pool = PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        let found = directory.resolve(&pool, "porch-sale").await.unwrap();
        assert_eq!(found.unwrap().slug, "porch-sale");
    }

    #[tokio::test]
    async fn test_deactivated_store_replaces_cached_entry() {
        let directory = StoreDirectory::new();
        directory.remember(store("porch-sale")).await;
        assert!(directory.cache.get("porch-sale").await.is_some());

        let mut closed = store("porch-sale");
        closed.is_active = false;
        directory.remember(closed).await;

        assert!(directory.cache.get("porch-sale").await.is_none());
    }
}
