//! Checkout: turning a customer cart into an order.
//!
//! The cart arrives from a cookie, so nothing in it is trusted. Every line is
//! re-read from the catalog; prices come from the catalog, and a line that
//! asks for more than is on hand fails the whole checkout. The customer then
//! reloads the cart, which re-syncs the ceilings.
//!
//! Writing the order, its item snapshots and the inventory decrement happens
//! in one transaction inside the store.

use std::future::Future;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use thriftbox_core::{Cart, Email, OrderId, ProductId, StoreId, line_total};

use crate::db::RepositoryError;
use crate::models::{DraftItem, Order, OrderDraft, ProductSnapshot, Store};

/// Reasons a checkout is refused.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("'{title}' is no longer available")]
    Unavailable { product_id: ProductId, title: String },

    #[error("only {available} of '{title}' left")]
    InsufficientStock {
        product_id: ProductId,
        title: String,
        available: u32,
    },

    /// Stock changed between validation and the write.
    #[error("stock changed during checkout: {0}")]
    StockChanged(String),

    #[error("storage error: {0}")]
    Storage(RepositoryError),
}

impl From<RepositoryError> for CheckoutError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(msg) => Self::StockChanged(msg),
            other => Self::Storage(other),
        }
    }
}

/// What the customer gets back after a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub order_id: OrderId,
    pub payment_session: String,
    pub total: Decimal,
    pub item_count: u32,
}

/// Storage used by checkout.
pub trait CheckoutStore: Sync {
    /// Live snapshots for `product_ids` within `store_id`.
    fn snapshots_for(
        &self,
        store_id: StoreId,
        product_ids: &[ProductId],
    ) -> impl Future<Output = Result<Vec<ProductSnapshot>, RepositoryError>> + Send;

    /// Persist the order, its items, and the stock decrement atomically.
    ///
    /// Returns `RepositoryError::Conflict` if stock ran out meanwhile.
    fn create_order(
        &self,
        draft: &OrderDraft,
    ) -> impl Future<Output = Result<Order, RepositoryError>> + Send;
}

/// Price and validate `cart` against live `snapshots`.
///
/// # Errors
///
/// Returns `EmptyCart`, `Unavailable` or `InsufficientStock`.
pub fn build_draft(
    store: &Store,
    cart: &Cart,
    snapshots: &[ProductSnapshot],
    customer_email: Email,
    customer_name: Option<String>,
    payment_session: String,
) -> Result<OrderDraft, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut items = Vec::with_capacity(cart.len());
    for line in cart.lines() {
        let Some(snapshot) = snapshots.iter().find(|s| s.product_id == line.product_id) else {
            // Cookie carts carry no titles, and this one is gone from the catalog
            let title = if line.title.is_empty() {
                format!("product {}", line.product_id)
            } else {
                line.title.clone()
            };
            return Err(CheckoutError::Unavailable {
                product_id: line.product_id,
                title,
            });
        };

        let available = snapshot.available();
        if available == 0 {
            return Err(CheckoutError::Unavailable {
                product_id: line.product_id,
                title: snapshot.title.clone(),
            });
        }
        if line.quantity > available {
            return Err(CheckoutError::InsufficientStock {
                product_id: line.product_id,
                title: snapshot.title.clone(),
                available,
            });
        }

        items.push(DraftItem {
            product_id: snapshot.product_id,
            title: snapshot.title.clone(),
            unit_price: snapshot.price,
            quantity: line.quantity,
            image_url: snapshot.image_url.clone(),
        });
    }

    let subtotal: Decimal = items
        .iter()
        .map(|i| line_total(i.unit_price, i.quantity))
        .sum();

    Ok(OrderDraft {
        user_id: store.user_id,
        store_id: store.id,
        customer_email,
        customer_name: customer_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        payment_session,
        subtotal,
        // No shipping, tax or discount layer yet
        total: subtotal,
        items,
    })
}

/// A fresh payment-session reference.
#[must_use]
pub fn new_payment_session() -> String {
    format!("cs_{}", Uuid::new_v4().simple())
}

/// Validate `cart` and write it as an order in `store`.
///
/// # Errors
///
/// See [`CheckoutError`]. Nothing is written unless every line validates.
#[instrument(skip(repo, store, cart, customer_email, customer_name), fields(store = %store.slug, lines = cart.len()))]
pub async fn place_order<S: CheckoutStore>(
    repo: &S,
    store: &Store,
    cart: &Cart,
    customer_email: Email,
    customer_name: Option<String>,
) -> Result<Receipt, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let ids: Vec<ProductId> = cart.lines().iter().map(|l| l.product_id).collect();
    let snapshots = repo.snapshots_for(store.id, &ids).await?;

    let draft = build_draft(
        store,
        cart,
        &snapshots,
        customer_email,
        customer_name,
        new_payment_session(),
    )?;
    let item_count = draft
        .items
        .iter()
        .fold(0u32, |acc, i| acc.saturating_add(i.quantity));

    let order = repo.create_order(&draft).await?;
    tracing::info!(order_id = %order.id, total = %order.total, "Order placed");

    Ok(Receipt {
        order_id: order.id,
        payment_session: order.payment_session,
        total: order.total,
        item_count,
    })
}
