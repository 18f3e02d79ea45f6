//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! # Storefront (per store, JSON)
//! GET  /s/{slug}/products              - Listed products with live stock
//! GET  /s/{slug}/cart                  - Cart view
//! POST /s/{slug}/cart/add              - Add a product {product_id, quantity?}
//! POST /s/{slug}/cart/update           - Set a quantity {product_id, quantity}
//! POST /s/{slug}/cart/remove           - Remove a product {product_id}
//! POST /s/{slug}/cart/clear            - Empty the cart
//! GET  /s/{slug}/cart/count            - Item count {count}
//! POST /s/{slug}/checkout              - Place an order {email, name?}
//! GET  /s/{slug}/orders/{id}?email=    - Order tracking
//! POST /s/{slug}/orders/{id}/reorder?email= - Put a past order back in the cart
//!
//! # API
//! POST /api/orders/status              - Seller fulfillment update (session)
//! POST /api/contact                    - Customer contact message
//! POST /api/visits                     - Store visit beacon (always 204)
//! ```
//!
//! `/health` and `/health/ready` are mounted by the binary.

pub mod api;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the per-store routes router, mounted at `/s/{slug}`.
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::place))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/reorder", post(orders::reorder))
}

/// Create the API routes router, mounted at `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/orders/status", post(api::orders::update_status))
        .route("/contact", post(api::contact::submit))
        .route("/visits", post(api::visits::record))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/s/{slug}", store_routes())
        .nest("/api", api_routes())
}
