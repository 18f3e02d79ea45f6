//! Product catalog and stock snapshots.
//!
//! Stock lives in its own `inventory` table; a product without an inventory
//! row has nothing on hand. Every read here collapses that to a plain
//! `quantity_on_hand` so callers never see the join shape.

use rust_decimal::Decimal;
use sqlx::PgPool;

use thriftbox_core::{ProductId, StoreId, UserId};

use super::RepositoryError;
use crate::models::ProductSnapshot;

#[derive(Debug, sqlx::FromRow)]
struct SnapshotRow {
    id: i32,
    title: String,
    price: Decimal,
    image_url: Option<String>,
    quantity_on_hand: i32,
}

impl From<SnapshotRow> for ProductSnapshot {
    fn from(row: SnapshotRow) -> Self {
        Self {
            product_id: ProductId::new(row.id),
            title: row.title,
            price: row.price,
            image_url: row.image_url,
            quantity_on_hand: row.quantity_on_hand,
        }
    }
}

const SNAPSHOT_SELECT: &str = r"
    SELECT p.id, p.title, p.price, p.image_url,
           COALESCE(i.quantity_on_hand, 0) AS quantity_on_hand
    FROM thriftbox.product p
    LEFT JOIN thriftbox.inventory i ON i.product_id = p.id
";

/// Repository for listed products and their stock.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Current price and stock of one listed product in a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_snapshot(
        &self,
        store_id: StoreId,
        product_id: ProductId,
    ) -> Result<Option<ProductSnapshot>, RepositoryError> {
        let sql = format!("{SNAPSHOT_SELECT} WHERE p.store_id = $1 AND p.id = $2 AND p.is_listed");
        let row = sqlx::query_as::<_, SnapshotRow>(&sql)
            .bind(store_id)
            .bind(product_id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(ProductSnapshot::from))
    }

    /// Snapshots for several products of one store. Unlisted or unknown IDs
    /// are simply absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn snapshots_for(
        &self,
        store_id: StoreId,
        product_ids: &[ProductId],
    ) -> Result<Vec<ProductSnapshot>, RepositoryError> {
        let ids: Vec<i32> = product_ids.iter().map(ProductId::as_i32).collect();
        let sql =
            format!("{SNAPSHOT_SELECT} WHERE p.store_id = $1 AND p.id = ANY($2) AND p.is_listed");
        let rows = sqlx::query_as::<_, SnapshotRow>(&sql)
            .bind(store_id)
            .bind(ids)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(ProductSnapshot::from).collect())
    }

    /// All listed products of a store, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_store(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<ProductSnapshot>, RepositoryError> {
        let sql = format!(
            "{SNAPSHOT_SELECT} WHERE p.store_id = $1 AND p.is_listed ORDER BY p.created_at DESC, p.id DESC"
        );
        let rows = sqlx::query_as::<_, SnapshotRow>(&sql)
            .bind(store_id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(ProductSnapshot::from).collect())
    }

    /// Create a listed product with an inventory row. Used by the CLI seeder.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either insert fails.
    pub async fn create_listed(
        &self,
        user_id: UserId,
        store_id: StoreId,
        title: &str,
        price: Decimal,
        quantity_on_hand: i32,
    ) -> Result<ProductId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (id,): (i32,) = sqlx::query_as(
            r"
            INSERT INTO thriftbox.product (user_id, store_id, title, price)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(store_id)
        .bind(title)
        .bind(price)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r"
            INSERT INTO thriftbox.inventory (product_id, quantity_on_hand)
            VALUES ($1, $2)
            ",
        )
        .bind(id)
        .bind(quantity_on_hand)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(ProductId::new(id))
    }
}
