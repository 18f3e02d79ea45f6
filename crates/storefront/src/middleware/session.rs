//! Seller sessions.
//!
//! Sessions are stored in `PostgreSQL` and only ever hold the signed-in
//! seller. The session id cookie is signed with the configured session key.
//! Customers never get a session; their carts travel in per-store cookies
//! instead.

use sqlx::PgPool;
use tower_sessions::cookie::{SameSite, time::Duration};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::ThriftboxConfig;

pub const SESSION_COOKIE_NAME: &str = "tb_session";

/// Idle time after which a seller must sign in again.
const SESSION_IDLE_TIMEOUT: Duration = Duration::days(7);

/// Build the session layer. Its table is created by `tb-cli migrate`.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &ThriftboxConfig,
) -> SessionManagerLayer<PostgresStore, SignedCookie> {
    SessionManagerLayer::new(PostgresStore::new(pool.clone()))
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(SESSION_IDLE_TIMEOUT))
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_signed(config.session_key.clone())
}
