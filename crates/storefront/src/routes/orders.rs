//! Customer order tracking and reorder.
//!
//! A customer proves an order is theirs with the email it was placed with.
//! Any mismatch is reported as not found.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use thriftbox_core::{Email, OrderId, reorder};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequestCookies;
use crate::models::{Order, OrderDetail, Store};
use crate::routes::cart::{CartView, describe_lines, load_cart, respond_with_cart};
use crate::state::AppState;

/// Customer proof of ownership.
#[derive(Debug, Deserialize)]
pub struct OrderAccessQuery {
    pub email: Option<String>,
}

async fn customer_order(
    state: &AppState,
    store: &Store,
    order_id: OrderId,
    email: Option<&str>,
) -> Result<Order> {
    let not_found = || AppError::NotFound(format!("order {order_id}"));
    let email = email
        .and_then(|e| Email::parse(e).ok())
        .ok_or_else(not_found)?;

    OrderRepository::new(state.pool())
        .get_for_customer(store.id, order_id, &email)
        .await?
        .ok_or_else(not_found)
}

/// Show an order with its items.
#[instrument(skip(state, query))]
pub async fn show(
    State(state): State<AppState>,
    Path((slug, order_id)): Path<(String, OrderId)>,
    Query(query): Query<OrderAccessQuery>,
) -> Result<Json<OrderDetail>> {
    let store = state.store_by_slug(&slug).await?;
    let order = customer_order(&state, &store, order_id, query.email.as_deref()).await?;
    let items = OrderRepository::new(state.pool()).items(order.id).await?;

    Ok(Json(OrderDetail {
        order: order.into(),
        items,
    }))
}

/// Put every line of a past order back into the cart.
///
/// Lines are clamped against current stock. An order without items leaves
/// the cart and its cookie untouched.
#[instrument(skip(state, query, cookies))]
pub async fn reorder(
    State(state): State<AppState>,
    Path((slug, order_id)): Path<(String, OrderId)>,
    Query(query): Query<OrderAccessQuery>,
    cookies: RequestCookies,
) -> Result<Response> {
    let store = state.store_by_slug(&slug).await?;
    let order = customer_order(&state, &store, order_id, query.email.as_deref()).await?;
    let lines = OrderRepository::new(state.pool())
        .historical_lines(order.id)
        .await?;

    let mut cart = load_cart(&cookies, &store);
    let fed = reorder::reorder_into(&mut cart, &lines);
    if fed == 0 {
        tracing::debug!("Order has no items, cart unchanged");
        describe_lines(&state, &store, &mut cart).await?;
        return Ok(Json(CartView::from(&cart)).into_response());
    }

    tracing::info!(lines = fed, "Order added to cart");
    respond_with_cart(&state, &store, cart).await
}
