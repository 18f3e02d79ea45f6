//! JSON API route handlers.
//!
//! - `orders` - Seller fulfillment status updates
//! - `contact` - Customer contact messages
//! - `visits` - Store visit beacons

pub mod contact;
pub mod orders;
pub mod visits;
