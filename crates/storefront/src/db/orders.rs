//! Order persistence: checkout writes, seller status updates, customer reads.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;

use thriftbox_core::{
    Email, FulfillmentStatus, HistoricalLine, OrderId, ProductId, StockRef, StoreId, UserId,
};

use super::{ProductRepository, RepositoryError};
use crate::models::{Order, OrderDraft, OrderItem, ProductSnapshot};
use crate::services::checkout::CheckoutStore;
use crate::services::order_status::{AppliedStatus, OrderStore, StatusChange};

const ORDER_COLUMNS: &str = r"
    o.id, o.user_id, o.store_id, o.customer_email, o.customer_name,
    o.fulfillment_status, o.payment_session, o.subtotal, o.total,
    o.created_at, o.updated_at, o.shipped_at, o.delivered_at
";

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    store_id: i32,
    customer_email: String,
    customer_name: Option<String>,
    fulfillment_status: FulfillmentStatus,
    payment_session: String,
    subtotal: Decimal,
    total: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    shipped_at: Option<DateTime<Utc>>,
    delivered_at: Option<DateTime<Utc>>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            store_id: StoreId::new(row.store_id),
            customer_email: row.customer_email,
            customer_name: row.customer_name,
            fulfillment_status: row.fulfillment_status,
            payment_session: row.payment_session,
            subtotal: row.subtotal,
            total: row.total,
            created_at: row.created_at,
            updated_at: row.updated_at,
            shipped_at: row.shipped_at,
            delivered_at: row.delivered_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StatusRow {
    #[sqlx(flatten)]
    order: OrderRow,
    previous_status: FulfillmentStatus,
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    product_id: i32,
    title: String,
    unit_price: Decimal,
    quantity: i32,
    image_url: Option<String>,
    product_snapshot: serde_json::Value,
}

impl From<ItemRow> for OrderItem {
    fn from(row: ItemRow) -> Self {
        Self {
            product_id: ProductId::new(row.product_id),
            title: row.title,
            unit_price: row.unit_price,
            quantity: row.quantity,
            image_url: row.image_url,
            product_snapshot: row.product_snapshot,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct HistoricalRow {
    product_id: i32,
    title: String,
    unit_price: Decimal,
    quantity: i32,
    image_url: Option<String>,
    stock: Option<Json<StockRef>>,
}

impl TryFrom<HistoricalRow> for HistoricalLine {
    type Error = RepositoryError;

    fn try_from(row: HistoricalRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "order item for product {} has quantity {}",
                row.product_id, row.quantity
            ))
        })?;

        Ok(Self {
            product_id: ProductId::new(row.product_id),
            title: row.title,
            unit_price: row.unit_price,
            quantity,
            image_url: row.image_url,
            stock: row.stock.map(|Json(stock)| stock),
        })
    }
}

/// Repository for orders and their items.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Write a fulfillment status change, scoped to the owning seller.
    ///
    /// The ownership filter, the row lock and the update run as one
    /// statement. Returns `None` when no order `order_id` belongs to `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn apply_status(
        &self,
        order_id: OrderId,
        owner: UserId,
        change: StatusChange,
    ) -> Result<Option<AppliedStatus>, RepositoryError> {
        let sql = format!(
            r"
            WITH prev AS (
                SELECT id, fulfillment_status
                FROM thriftbox.customer_order
                WHERE id = $1 AND user_id = $2
                FOR UPDATE
            )
            UPDATE thriftbox.customer_order o
            SET fulfillment_status = $3,
                shipped_at = CASE WHEN $4 THEN $6 ELSE o.shipped_at END,
                delivered_at = CASE WHEN $5 THEN $6 ELSE o.delivered_at END,
                updated_at = $6
            FROM prev
            WHERE o.id = prev.id
            RETURNING {ORDER_COLUMNS}, prev.fulfillment_status AS previous_status
            "
        );

        let row = sqlx::query_as::<_, StatusRow>(&sql)
            .bind(order_id)
            .bind(owner)
            .bind(change.status)
            .bind(change.stamp_shipped)
            .bind(change.stamp_delivered)
            .bind(change.at)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(|row| AppliedStatus {
            previous: row.previous_status,
            order: row.order.into(),
        }))
    }

    /// An order of `store_id`, visible only to the customer who placed it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_customer(
        &self,
        store_id: StoreId,
        order_id: OrderId,
        email: &Email,
    ) -> Result<Option<Order>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM thriftbox.customer_order o
            WHERE o.id = $1 AND o.store_id = $2 AND lower(o.customer_email) = $3
            "
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(order_id)
            .bind(store_id)
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Order::from))
    }

    /// Line-item snapshots of an order, in the order they were written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r"
            SELECT product_id, title, unit_price, quantity, image_url, product_snapshot
            FROM thriftbox.order_item
            WHERE order_id = $1
            ORDER BY id
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    /// Order items joined with the product's current inventory, for reorder.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` for a negative stored quantity.
    pub async fn historical_lines(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<HistoricalLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, HistoricalRow>(
            r"
            SELECT oi.product_id, oi.title, oi.unit_price, oi.quantity, oi.image_url,
                   to_jsonb(inv) AS stock
            FROM thriftbox.order_item oi
            LEFT JOIN thriftbox.inventory inv ON inv.product_id = oi.product_id
            WHERE oi.order_id = $1
            ORDER BY oi.id
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(HistoricalLine::try_from).collect()
    }

    /// Write an order, its item snapshots and the stock decrement in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if any product no longer has
    /// enough stock, in which case nothing is written.
    #[instrument(skip(self, draft), fields(store_id = %draft.store_id, items = draft.items.len()))]
    pub async fn create_order(&self, draft: &OrderDraft) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r"
            INSERT INTO thriftbox.customer_order AS o
                (user_id, store_id, customer_email, customer_name, fulfillment_status,
                 payment_session, subtotal, total)
            VALUES ($1, $2, $3, $4, 'pending', $5, $6, $7)
            RETURNING {ORDER_COLUMNS}
            "
        );
        let order: Order = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(draft.user_id)
            .bind(draft.store_id)
            .bind(draft.customer_email.as_str())
            .bind(draft.customer_name.as_deref())
            .bind(&draft.payment_session)
            .bind(draft.subtotal)
            .bind(draft.total)
            .fetch_one(&mut *tx)
            .await?
            .into();

        for item in &draft.items {
            let quantity = i32::try_from(item.quantity).map_err(|_| {
                RepositoryError::Conflict(format!("quantity {} out of range", item.quantity))
            })?;

            let decremented = sqlx::query(
                r"
                UPDATE thriftbox.inventory
                SET quantity_on_hand = quantity_on_hand - $2, updated_at = NOW()
                WHERE product_id = $1 AND quantity_on_hand >= $2
                ",
            )
            .bind(item.product_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;

            if decremented.rows_affected() == 0 {
                // Dropping the transaction rolls back the order insert
                return Err(RepositoryError::Conflict(format!(
                    "'{}' no longer has {} in stock",
                    item.title, item.quantity
                )));
            }

            let snapshot = json!({
                "product_id": item.product_id,
                "title": item.title,
                "price": item.unit_price,
                "image_url": item.image_url,
            });

            sqlx::query(
                r"
                INSERT INTO thriftbox.order_item
                    (order_id, product_id, title, unit_price, quantity, image_url, product_snapshot)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ",
            )
            .bind(order.id)
            .bind(item.product_id)
            .bind(&item.title)
            .bind(item.unit_price)
            .bind(quantity)
            .bind(item.image_url.as_deref())
            .bind(snapshot)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(order)
    }
}

impl OrderStore for OrderRepository<'_> {
    async fn apply_status(
        &self,
        order_id: OrderId,
        owner: UserId,
        change: StatusChange,
    ) -> Result<Option<AppliedStatus>, RepositoryError> {
        Self::apply_status(self, order_id, owner, change).await
    }
}

impl CheckoutStore for OrderRepository<'_> {
    async fn snapshots_for(
        &self,
        store_id: StoreId,
        product_ids: &[ProductId],
    ) -> Result<Vec<ProductSnapshot>, RepositoryError> {
        ProductRepository::new(self.pool)
            .snapshots_for(store_id, product_ids)
            .await
    }

    async fn create_order(&self, draft: &OrderDraft) -> Result<Order, RepositoryError> {
        Self::create_order(self, draft).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn historical_row(quantity: i32, stock: Option<&str>) -> HistoricalRow {
        HistoricalRow {
            product_id: 12,
            title: "Brass candlestick".to_string(),
            unit_price: Decimal::new(1800, 2),
            quantity,
            image_url: None,
            stock: stock.map(|s| Json(serde_json::from_str(s).unwrap())),
        }
    }

    #[test]
    fn test_historical_row_keeps_joined_stock() {
        let line = HistoricalLine::try_from(historical_row(
            2,
            Some(r#"{"product_id":12,"quantity_on_hand":4,"updated_at":"2026-01-01T00:00:00Z"}"#),
        ))
        .unwrap();

        assert_eq!(line.quantity, 2);
        assert_eq!(line.live_stock(), 4);
    }

    #[test]
    fn test_historical_row_without_inventory() {
        let line = HistoricalLine::try_from(historical_row(3, None)).unwrap();
        assert_eq!(line.live_stock(), 0);
        assert_eq!(line.to_cart_line().max_quantity, 3);
    }

    #[test]
    fn test_negative_item_quantity_is_corruption() {
        let err = HistoricalLine::try_from(historical_row(-1, None)).unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }
}
