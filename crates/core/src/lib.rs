//! Thriftbox Core - Shared types and cart logic.
//!
//! This crate provides the pieces shared by every Thriftbox component:
//! - `storefront` - Public storefront and seller API server
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. The cart lives on the customer's device and the reorder
//! composer only reshapes data it is handed, so both are kept here where they
//! can be tested without a server.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money helpers, emails, and fulfillment status
//! - [`cart`] - The customer-side cart and its clamping rules
//! - [`reorder`] - Rebuilding cart lines from a past order

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod reorder;
pub mod types;

pub use cart::{Cart, CartLine};
pub use reorder::{HistoricalLine, StockRecord, StockRef};
pub use types::*;
