//! Seed a demo store.
//!
//! Creates an active store and a handful of listed products with stock, so a
//! fresh database has something to browse, cart and check out.

use rust_decimal::Decimal;
use tracing::info;

use thriftbox_core::UserId;
use thriftbox_storefront::db::{self, ProductRepository, StoreRepository};

use super::{CommandError, database_url};

/// Title, price in cents, units on hand.
const DEMO_PRODUCTS: &[(&str, i64, i32)] = &[
    ("Mid-century table lamp", 4800, 1),
    ("Levi's 501, W32 L30", 3500, 2),
    ("Pyrex mixing bowl set", 2600, 3),
    ("Vinyl: Blue Note sampler", 1800, 5),
    ("Hand-knit wool scarf", 1200, 0),
];

/// Create a demo store for `seller`.
///
/// # Errors
///
/// Returns an error if the slug is taken or the database is unreachable.
pub async fn demo_store(slug: &str, seller: i32, name: Option<&str>) -> Result<(), CommandError> {
    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;
    let seller = UserId::new(seller);

    let store = StoreRepository::new(&pool)
        .create(seller, slug, name.unwrap_or(slug))
        .await?;
    info!(store_id = %store.id, slug = %store.slug, "Store created");

    let products = ProductRepository::new(&pool);
    for &(title, cents, on_hand) in DEMO_PRODUCTS {
        let id = products
            .create_listed(seller, store.id, title, Decimal::new(cents, 2), on_hand)
            .await?;
        info!(product_id = %id, title, on_hand, "Product listed");
    }

    info!("Seeding complete! Browse /s/{}/products", store.slug);
    Ok(())
}
