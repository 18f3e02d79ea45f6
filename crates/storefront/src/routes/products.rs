//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use thriftbox_core::{ProductId, format_usd};

use crate::db::ProductRepository;
use crate::error::Result;
use crate::models::ProductSnapshot;
use crate::state::AppState;

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub product_id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub price_display: String,
    pub image_url: Option<String>,
    pub available: u32,
}

impl From<ProductSnapshot> for ProductView {
    fn from(snapshot: ProductSnapshot) -> Self {
        Self {
            available: snapshot.available(),
            price_display: format_usd(snapshot.price),
            product_id: snapshot.product_id,
            title: snapshot.title,
            price: snapshot.price,
            image_url: snapshot.image_url,
        }
    }
}

/// Store listing response.
#[derive(Debug, Serialize)]
pub struct ProductsIndex {
    pub store: String,
    pub products: Vec<ProductView>,
}

/// List a store's products with live stock.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductsIndex>> {
    let store = state.store_by_slug(&slug).await?;
    let products = ProductRepository::new(state.pool())
        .list_for_store(store.id)
        .await?;

    Ok(Json(ProductsIndex {
        store: store.name,
        products: products.into_iter().map(ProductView::from).collect(),
    }))
}
