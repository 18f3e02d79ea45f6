//! Store lookups.

use sqlx::PgPool;

use thriftbox_core::{StoreId, UserId};

use super::RepositoryError;
use crate::models::Store;

#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: i32,
    user_id: i32,
    slug: String,
    name: String,
    is_active: bool,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Self {
            id: StoreId::new(row.id),
            user_id: UserId::new(row.user_id),
            slug: row.slug,
            name: row.name,
            is_active: row.is_active,
        }
    }
}

/// Repository for storefront records.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an active store by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            SELECT id, user_id, slug, name, is_active
            FROM thriftbox.store
            WHERE slug = $1 AND is_active
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Store::from))
    }

    /// Create a store. Used by the CLI seeder.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    pub async fn create(
        &self,
        user_id: UserId,
        slug: &str,
        name: &str,
    ) -> Result<Store, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            INSERT INTO thriftbox.store (user_id, slug, name)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, slug, name, is_active
            ",
        )
        .bind(user_id)
        .bind(slug)
        .bind(name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(format!("store slug '{slug}' already exists"));
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }
}
