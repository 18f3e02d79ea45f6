//! Customer contact messages.

use thriftbox_core::{Email, StoreId};

/// A validated message ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContactMessage {
    pub store_id: StoreId,
    pub name: String,
    pub email: Email,
    pub order_number: Option<String>,
    pub subject: String,
    pub message: String,
}
