//! Orders and their line items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use thriftbox_core::{Email, FulfillmentStatus, OrderId, ProductId, StoreId, UserId};

/// A placed order. Owned by the seller of the store it was placed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub store_id: StoreId,
    pub customer_email: String,
    pub customer_name: Option<String>,
    pub fulfillment_status: FulfillmentStatus,
    pub payment_session: String,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

/// Snapshot of one cart line at purchase time. Never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub image_url: Option<String>,
    /// Denormalized product record as it was when the order was placed.
    pub product_snapshot: serde_json::Value,
}

/// An order as its customer may see it: no seller id, no payment reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerOrder {
    pub id: OrderId,
    pub store_id: StoreId,
    pub customer_email: String,
    pub customer_name: Option<String>,
    pub fulfillment_status: FulfillmentStatus,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl From<Order> for CustomerOrder {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            store_id: order.store_id,
            customer_email: order.customer_email,
            customer_name: order.customer_name,
            fulfillment_status: order.fulfillment_status,
            subtotal: order.subtotal,
            total: order.total,
            created_at: order.created_at,
            updated_at: order.updated_at,
            shipped_at: order.shipped_at,
            delivered_at: order.delivered_at,
        }
    }
}

/// An order with its items, as shown to the customer tracking it.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: CustomerOrder,
    pub items: Vec<OrderItem>,
}

/// An order about to be written by checkout.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub user_id: UserId,
    pub store_id: StoreId,
    pub customer_email: Email,
    pub customer_name: Option<String>,
    pub payment_session: String,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub items: Vec<DraftItem>,
}

/// One line of an [`OrderDraft`], priced from the live catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftItem {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub image_url: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_order_detail_hides_seller_and_payment() {
        let now = Utc::now();
        let order = Order {
            id: OrderId::new(7),
            user_id: UserId::new(3),
            store_id: StoreId::new(2),
            customer_email: "buyer@example.com".to_string(),
            customer_name: None,
            fulfillment_status: FulfillmentStatus::Shipped,
            payment_session: "cs_0123".to_string(),
            subtotal: Decimal::new(2600, 2),
            total: Decimal::new(2600, 2),
            created_at: now,
            updated_at: now,
            shipped_at: Some(now),
            delivered_at: None,
        };

        let detail = OrderDetail {
            order: order.into(),
            items: Vec::new(),
        };
        let json = serde_json::to_value(&detail).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["fulfillment_status"], "shipped");
        assert!(json.get("user_id").is_none());
        assert!(json.get("payment_session").is_none());
    }
}
