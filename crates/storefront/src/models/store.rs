//! Storefronts.

use serde::Serialize;

use thriftbox_core::{StoreId, UserId};

/// A seller's public storefront, addressed by its slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Store {
    pub id: StoreId,
    pub user_id: UserId,
    pub slug: String,
    pub name: String,
    pub is_active: bool,
}
