//! Seller authentication extractor.
//!
//! Sellers sign in through the account service, which writes a
//! [`CurrentSeller`] into the shared session store. Seller API routes only
//! need to read it back.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::error::set_sentry_user;
use crate::models::{CurrentSeller, session_keys};

/// Extractor that requires a signed-in seller.
///
/// # Example
///
/// ```rust,ignore
/// async fn seller_handler(RequireSeller(seller): RequireSeller) -> impl IntoResponse {
///     format!("Hello, {}!", seller.email)
/// }
/// ```
pub struct RequireSeller(pub CurrentSeller);

/// Rejection when no seller is signed in.
#[derive(Debug)]
pub struct SellerRejection;

impl IntoResponse for SellerRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            axum::Json(json!({ "error": "Unauthorized" })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireSeller
where
    S: Send + Sync,
{
    type Rejection = SellerRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(SellerRejection)?;

        let seller: CurrentSeller = session
            .get(session_keys::CURRENT_SELLER)
            .await
            .ok()
            .flatten()
            .ok_or(SellerRejection)?;

        set_sentry_user(&seller.id, Some(seller.email.as_str()));
        Ok(Self(seller))
    }
}
