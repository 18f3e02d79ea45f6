//! Database operations for the Thriftbox `PostgreSQL` schema.
//!
//! # Schema: `thriftbox`
//!
//! - `store` - Storefronts, one or more per seller, addressed by slug
//! - `product` - Catalog entries (price, title, listing flag)
//! - `inventory` - Units on hand per product
//! - `customer_order` - Placed orders, owned by the store's seller
//! - `order_item` - Immutable line snapshots of an order
//! - `contact_message` - Customer support messages
//! - `store_visit` - Storefront page-view beacons
//! - `tower_sessions.session` - Session storage (created by the store itself)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p thriftbox-cli -- migrate
//! ```
//!
//! Repositories borrow the pool and are built per request from `AppState`,
//! so every query runs against the pool it is handed.

pub mod contact;
pub mod orders;
pub mod products;
pub mod stores;
pub mod visits;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use contact::ContactRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use stores::StoreRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// A write lost a race or broke a constraint (e.g. stock ran out).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
