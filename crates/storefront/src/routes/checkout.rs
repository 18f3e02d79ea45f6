//! Checkout route handler.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use thriftbox_core::Email;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::{ApiJson, RequestCookies};
use crate::routes::cart::load_cart;
use crate::services::{cart_cookie, checkout};
use crate::state::AppState;

/// Checkout request body.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub email: String,
    pub name: Option<String>,
}

/// Place an order for the current cart.
///
/// On success the cart cookie is deleted; on failure it is left as it was so
/// the customer can fix the cart and retry.
#[instrument(skip(state, cookies, body))]
pub async fn place(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    cookies: RequestCookies,
    ApiJson(body): ApiJson<CheckoutRequest>,
) -> Result<Response> {
    let email = Email::parse(&body.email).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let store = state.store_by_slug(&slug).await?;
    let cart = load_cart(&cookies, &store);

    let receipt = checkout::place_order(
        &OrderRepository::new(state.pool()),
        &store,
        &cart,
        email,
        body.name,
    )
    .await?;

    let removal = cart_cookie::removal_cookie(&store.slug, state.config().is_secure());
    Ok((
        StatusCode::CREATED,
        AppendHeaders([(SET_COOKIE, removal.to_string())]),
        Json(receipt),
    )
        .into_response())
}
