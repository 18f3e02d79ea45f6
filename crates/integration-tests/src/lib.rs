//! Integration tests for Thriftbox.
//!
//! # Running Tests
//!
//! ```bash
//! # Migrate a scratch database and start the server against it
//! cargo run -p thriftbox-cli -- migrate
//! cargo run -p thriftbox-storefront
//!
//! # Run integration tests
//! cargo test -p thriftbox-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `THRIFTBOX_TEST_BASE_URL` - Running server (default `http://localhost:3000`)
//! - `THRIFTBOX_DATABASE_URL` / `DATABASE_URL` - Same database the server uses
//!
//! Every test seeds its own store under a random slug, so tests can run in
//! parallel against one database.

use reqwest::Client;
use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::PgPool;
use uuid::Uuid;

use thriftbox_core::{Cart, Email, OrderId, ProductId, UserId};
use thriftbox_storefront::db::{self, OrderRepository, ProductRepository, StoreRepository};
use thriftbox_storefront::models::Store;
use thriftbox_storefront::services::checkout;

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("THRIFTBOX_TEST_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Shared handles for one test.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub pool: PgPool,
}

impl TestContext {
    /// Connect to the test database and build a cookie-keeping client.
    ///
    /// # Panics
    ///
    /// Panics if the database URL is unset or unreachable.
    #[allow(clippy::expect_used)]
    pub async fn new() -> Self {
        let database_url = std::env::var("THRIFTBOX_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .map(SecretString::from)
            .expect("THRIFTBOX_DATABASE_URL not set");
        let pool = db::create_pool(&database_url)
            .await
            .expect("Failed to connect to test database");

        Self {
            client: fresh_client(),
            base_url: base_url(),
            pool,
        }
    }

    /// URL of a path under store `slug`.
    #[must_use]
    pub fn store_url(&self, slug: &str, path: &str) -> String {
        format!("{}/s/{slug}{path}", self.base_url)
    }

    /// URL of an API path.
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    /// Create a store with a random slug, owned by `seller`.
    ///
    /// # Panics
    ///
    /// Panics if the insert fails.
    #[allow(clippy::expect_used)]
    pub async fn seed_store(&self, seller: i32) -> Store {
        let slug = format!("it-{}", Uuid::new_v4().simple());
        StoreRepository::new(&self.pool)
            .create(UserId::new(seller), &slug, "Integration Test Store")
            .await
            .expect("Failed to seed store")
    }

    /// List a product in `store` with `on_hand` units.
    ///
    /// # Panics
    ///
    /// Panics if the insert fails.
    #[allow(clippy::expect_used)]
    pub async fn seed_product(&self, store: &Store, title: &str, cents: i64, on_hand: i32) -> ProductId {
        ProductRepository::new(&self.pool)
            .create_listed(store.user_id, store.id, title, Decimal::new(cents, 2), on_hand)
            .await
            .expect("Failed to seed product")
    }

    /// Place a one-line `pending` order in `store` for `email`, through the
    /// same checkout service the storefront uses.
    ///
    /// # Panics
    ///
    /// Panics if seeding or checkout fails.
    #[allow(clippy::expect_used)]
    pub async fn seed_order(&self, store: &Store, email: &Email) -> OrderId {
        let product = self.seed_product(store, "Enamel coffee pot", 2600, 2).await;
        let snapshot = ProductRepository::new(&self.pool)
            .get_snapshot(store.id, product)
            .await
            .expect("Failed to read seeded product")
            .expect("Seeded product is not listed");

        let mut cart = Cart::new();
        cart.add_item(snapshot.to_cart_line(1));

        checkout::place_order(
            &OrderRepository::new(&self.pool),
            store,
            &cart,
            email.clone(),
            None,
        )
        .await
        .expect("Failed to place order")
        .order_id
    }
}

/// A client with its own cookie jar, i.e. a separate customer device.
///
/// # Panics
///
/// Panics if the TLS backend cannot be initialized.
#[must_use]
#[allow(clippy::expect_used)]
pub fn fresh_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
