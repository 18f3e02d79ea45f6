//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `cart_cookie` - Cart persistence in a per-store browser cookie
//! - `checkout` - Cart validation and order creation
//! - `contact` - Customer contact messages
//! - `order_status` - Seller fulfillment status updates
//! - `store_directory` - Cached slug to store resolution
//!
//! Services that touch storage are generic over a small store trait
//! (`CheckoutStore`, `ContactStore`, `OrderStore`). The `db` repositories
//! implement them for Postgres; tests use in-memory implementations.

pub mod cart_cookie;
pub mod checkout;
pub mod contact;
pub mod order_status;
pub mod store_directory;

pub use cart_cookie::CartCookieError;
pub use checkout::{CheckoutError, CheckoutStore, Receipt};
pub use contact::{ContactError, ContactForm, ContactStore};
pub use order_status::{OrderStatusError, OrderStore};
pub use store_directory::StoreDirectory;
