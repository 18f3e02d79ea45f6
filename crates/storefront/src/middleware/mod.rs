//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! Extractors: [`RequireSeller`] for seller API routes,
//! [`RequestCookies`] for per-store cart cookies and [`ApiJson`] for request
//! bodies.

pub mod auth;
pub mod cookies;
pub mod json;
pub mod request_id;
pub mod session;

pub use auth::RequireSeller;
pub use cookies::RequestCookies;
pub use json::ApiJson;
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
