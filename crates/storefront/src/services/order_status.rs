//! Seller-side fulfillment status updates.
//!
//! The write is accepted for any of the four statuses regardless of the
//! order's current one; a backward move is allowed but logged. Timestamps
//! follow the target status:
//!
//! | target      | `shipped_at` | `delivered_at` |
//! |-------------|--------------|----------------|
//! | `pending`   | kept         | kept           |
//! | `shipped`   | now          | kept           |
//! | `delivered` | now          | now            |
//! | `fulfilled` | now          | now            |
//!
//! Ownership is checked by the store in the same statement that writes, and
//! a foreign order is indistinguishable from a missing one.

use std::future::Future;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::instrument;

use thriftbox_core::{FulfillmentStatus, OrderId, StatusParseError, UserId};

use crate::db::RepositoryError;
use crate::models::Order;

/// Errors from a status update, one variant per outcome the caller reports.
#[derive(Debug, Error)]
pub enum OrderStatusError {
    /// A required request field was absent or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The target status is not one of the four accepted values.
    #[error(transparent)]
    InvalidStatus(#[from] StatusParseError),

    /// No order with this ID is owned by the requesting seller.
    #[error("order not found")]
    NotFound,

    /// The write failed.
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// The column writes a status update performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub status: FulfillmentStatus,
    pub at: DateTime<Utc>,
    pub stamp_shipped: bool,
    pub stamp_delivered: bool,
}

impl StatusChange {
    /// Writes for moving to `status` at time `at`.
    #[must_use]
    pub const fn new(status: FulfillmentStatus, at: DateTime<Utc>) -> Self {
        Self {
            status,
            at,
            stamp_shipped: status.stamps_shipped_at(),
            stamp_delivered: status.stamps_delivered_at(),
        }
    }
}

/// Result of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedStatus {
    pub order: Order,
    pub previous: FulfillmentStatus,
}

/// Storage for status writes.
pub trait OrderStore: Sync {
    /// Apply `change` to `order_id` if and only if `owner` owns it.
    ///
    /// Returns `None` when the order is missing or owned by someone else, in
    /// which case nothing is written.
    fn apply_status(
        &self,
        order_id: OrderId,
        owner: UserId,
        change: StatusChange,
    ) -> impl Future<Output = Result<Option<AppliedStatus>, RepositoryError>> + Send;
}

/// Update an order's fulfillment status on behalf of `owner`.
///
/// `order_id` and `status` come straight from the request body; both are
/// validated before the store is touched.
///
/// # Errors
///
/// - `MissingField` / `InvalidStatus` for bad input
/// - `NotFound` when the order is missing or not owned by `owner`
/// - `Storage` when the write fails
#[instrument(skip(store), fields(seller_id = %owner))]
pub async fn update_status<S: OrderStore>(
    store: &S,
    owner: UserId,
    order_id: Option<OrderId>,
    status: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Order, OrderStatusError> {
    let order_id = order_id.ok_or(OrderStatusError::MissingField("order_id"))?;
    let status = status
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(OrderStatusError::MissingField("status"))?;
    let status: FulfillmentStatus = status.parse()?;

    let applied = store
        .apply_status(order_id, owner, StatusChange::new(status, now))
        .await?
        .ok_or(OrderStatusError::NotFound)?;

    if applied.previous != status && !applied.previous.is_forward_to(status) {
        tracing::warn!(
            order_id = %order_id,
            from = %applied.previous,
            to = %status,
            "Order status moved backward"
        );
    } else {
        tracing::info!(order_id = %order_id, from = %applied.previous, to = %status, "Order status updated");
    }

    Ok(applied.order)
}
