//! Domain models for the storefront server.
//!
//! These are the shapes handed between repositories, services and routes.
//! Database row types stay private to `db`.

pub mod contact;
pub mod order;
pub mod product;
pub mod session;
pub mod store;

pub use contact::NewContactMessage;
pub use order::{CustomerOrder, DraftItem, Order, OrderDetail, OrderDraft, OrderItem};
pub use product::ProductSnapshot;
pub use session::{CurrentSeller, keys as session_keys};
pub use store::Store;
