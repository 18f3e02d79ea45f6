//! Session-related types.
//!
//! Seller sign-in is handled by the account service, which shares the session
//! store with this server. This server only reads the identity it leaves
//! behind.

use serde::{Deserialize, Serialize};

use thriftbox_core::{Email, UserId};

/// Session-stored seller identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentSeller {
    /// Seller's database ID.
    pub id: UserId,
    /// Seller's email address.
    pub email: Email,
}

/// Session keys.
pub mod keys {
    /// Key for the signed-in seller.
    pub const CURRENT_SELLER: &str = "current_seller";
}
