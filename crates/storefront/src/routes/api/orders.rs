//! Seller order API.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use thriftbox_core::OrderId;

use crate::db::OrderRepository;
use crate::error::Result;
use crate::middleware::{ApiJson, RequireSeller};
use crate::models::Order;
use crate::services::order_status;
use crate::state::AppState;

/// Status update request body. Both fields are checked by the service so a
/// missing one is reported by name.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub order_id: Option<OrderId>,
    pub status: Option<String>,
}

/// Set the fulfillment status of one of the seller's orders.
#[instrument(skip(state, seller), fields(seller_id = %seller.id))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
    ApiJson(body): ApiJson<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    let order = order_status::update_status(
        &OrderRepository::new(state.pool()),
        seller.id,
        body.order_id,
        body.status.as_deref(),
        Utc::now(),
    )
    .await?;

    Ok(Json(order))
}
