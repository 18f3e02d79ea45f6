//! Storefront visit beacons.

use sqlx::PgPool;

use thriftbox_core::StoreId;

use super::RepositoryError;

/// Longest path stored; anything beyond is cut.
const MAX_PATH_LENGTH: usize = 512;

/// Record one page view of a store.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn record_visit(
    pool: &PgPool,
    store_id: StoreId,
    path: Option<&str>,
) -> Result<(), RepositoryError> {
    let path = path.map(|p| p.chars().take(MAX_PATH_LENGTH).collect::<String>());

    sqlx::query("INSERT INTO thriftbox.store_visit (store_id, path) VALUES ($1, $2)")
        .bind(store_id)
        .bind(path)
        .execute(pool)
        .await?;

    Ok(())
}
