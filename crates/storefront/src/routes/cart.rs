//! Cart route handlers.
//!
//! The cart is read from the store's cart cookie on every request, mutated
//! locally, and written back with `Set-Cookie`. Quantities are clamped,
//! absent products are no-ops and an unreadable cookie starts a fresh cart.
//! The one refusal is a cart too large for its cookie, which answers 400
//! rather than dropping the change.

use axum::{
    Json,
    extract::{Path, State},
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use thriftbox_core::{Cart, CartLine, ProductId, format_usd};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::{ApiJson, RequestCookies};
use crate::models::Store;
use crate::services::cart_cookie;
use crate::state::AppState;

/// One cart line as shown to the customer.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub product_id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub quantity: u32,
    pub max_quantity: u32,
    pub image_url: String,
    pub line_total: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            title: line.title.clone(),
            price: line.unit_price,
            quantity: line.quantity,
            max_quantity: line.max_quantity,
            image_url: line.image_url.clone(),
            line_total: format_usd(line.line_total()),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub subtotal: String,
    pub total: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartLineView::from).collect(),
            subtotal: format_usd(cart.subtotal()),
            total: format_usd(cart.total()),
            item_count: cart.item_count(),
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Update quantity request body. Zero or negative removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
}

/// Cart count response.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u32,
}

// =============================================================================
// Cookie Helpers
// =============================================================================

/// Load the cart of `store` from the request cookies.
pub(crate) fn load_cart(cookies: &RequestCookies, store: &Store) -> Cart {
    cart_cookie::load(cookies.get(&cart_cookie::cookie_name(&store.slug)))
}

/// Fill in titles and images from the catalog, since the cookie does not
/// carry them. Products that are no longer listed keep an empty title.
pub(crate) async fn describe_lines(state: &AppState, store: &Store, cart: &mut Cart) -> Result<()> {
    if cart.is_empty() {
        return Ok(());
    }

    let snapshots = ProductRepository::new(state.pool())
        .snapshots_for(store.id, &cart.product_ids())
        .await?;
    for snapshot in &snapshots {
        cart.describe(
            snapshot.product_id,
            &snapshot.title,
            snapshot.image_url.as_deref().unwrap_or_default(),
        );
    }
    Ok(())
}

/// Persist the cart in its cookie and respond with the cart view.
///
/// A cart the browser would not keep is refused with a 400, so the customer
/// never sees a change that silently fails to persist.
pub(crate) async fn respond_with_cart(
    state: &AppState,
    store: &Store,
    mut cart: Cart,
) -> Result<Response> {
    let config = state.config();
    let cookie = cart_cookie::build_cookie(
        &store.slug,
        &cart,
        config.cart_max_age_days,
        config.is_secure(),
    )
    .inspect_err(|e| tracing::info!(error = %e, lines = cart.len(), "Cart not saved"))?;

    describe_lines(state, store, &mut cart).await?;
    Ok((
        AppendHeaders([(SET_COOKIE, cookie.to_string())]),
        Json(CartView::from(&cart)),
    )
        .into_response())
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart.
#[instrument(skip(state, cookies))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    cookies: RequestCookies,
) -> Result<Json<CartView>> {
    let store = state.store_by_slug(&slug).await?;
    let mut cart = load_cart(&cookies, &store);
    describe_lines(&state, &store, &mut cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add a product, synced with its current price and stock.
///
/// Refused with a 400 once the cart holds the most products a cookie can
/// carry.
#[instrument(skip(state, cookies), fields(product_id = %body.product_id))]
pub async fn add(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    cookies: RequestCookies,
    ApiJson(body): ApiJson<AddToCartRequest>,
) -> Result<Response> {
    let store = state.store_by_slug(&slug).await?;
    let snapshot = ProductRepository::new(state.pool())
        .get_snapshot(store.id, body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", body.product_id)))?;

    let mut cart = load_cart(&cookies, &store);
    let quantity = body.quantity.unwrap_or(1);
    if snapshot.available() == 0 {
        tracing::debug!("Product out of stock, not added");
    }
    cart.add_item(snapshot.to_cart_line(quantity));

    respond_with_cart(&state, &store, cart).await
}

/// Set the quantity of a line.
#[instrument(skip(state, cookies), fields(product_id = %body.product_id))]
pub async fn update(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    cookies: RequestCookies,
    ApiJson(body): ApiJson<UpdateCartRequest>,
) -> Result<Response> {
    let store = state.store_by_slug(&slug).await?;
    let mut cart = load_cart(&cookies, &store);
    cart.update_quantity(body.product_id, body.quantity);
    respond_with_cart(&state, &store, cart).await
}

/// Remove a line.
#[instrument(skip(state, cookies), fields(product_id = %body.product_id))]
pub async fn remove(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    cookies: RequestCookies,
    ApiJson(body): ApiJson<RemoveFromCartRequest>,
) -> Result<Response> {
    let store = state.store_by_slug(&slug).await?;
    let mut cart = load_cart(&cookies, &store);
    cart.remove_item(body.product_id);
    respond_with_cart(&state, &store, cart).await
}

/// Empty the cart and delete its cookie.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Response> {
    let store = state.store_by_slug(&slug).await?;
    let removal = cart_cookie::removal_cookie(&store.slug, state.config().is_secure());

    Ok((
        AppendHeaders([(SET_COOKIE, removal.to_string())]),
        Json(CartView::from(&Cart::new())),
    )
        .into_response())
}

/// Number of units in the cart.
#[instrument(skip(state, cookies))]
pub async fn count(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    cookies: RequestCookies,
) -> Result<Json<CartCount>> {
    let store = state.store_by_slug(&slug).await?;
    let cart = load_cart(&cookies, &store);
    Ok(Json(CartCount {
        count: cart.item_count(),
    }))
}
