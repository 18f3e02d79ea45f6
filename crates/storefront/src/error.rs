//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`.
//! Responses are JSON: `{"error": "<message>"}`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{CartCookieError, CheckoutError, ContactError, OrderStatusError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// No signed-in seller.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request conflicts with current state (e.g. stock changed).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<OrderStatusError> for AppError {
    fn from(err: OrderStatusError) -> Self {
        match err {
            OrderStatusError::MissingField(_) | OrderStatusError::InvalidStatus(_) => {
                Self::BadRequest(err.to_string())
            }
            OrderStatusError::NotFound => Self::NotFound("order".to_string()),
            OrderStatusError::Storage(e) => Self::Database(e),
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::EmptyCart
            | CheckoutError::Unavailable { .. }
            | CheckoutError::InsufficientStock { .. } => Self::BadRequest(err.to_string()),
            CheckoutError::StockChanged(msg) => Self::Conflict(msg),
            CheckoutError::Storage(e) => Self::Database(e),
        }
    }
}

impl From<ContactError> for AppError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::MissingField(_)
            | ContactError::InvalidEmail(_)
            | ContactError::TooLong { .. } => Self::BadRequest(err.to_string()),
            ContactError::StoreNotFound => Self::NotFound("store".to_string()),
            ContactError::Storage(e) => Self::Database(e),
        }
    }
}

impl From<CartCookieError> for AppError {
    fn from(err: CartCookieError) -> Self {
        match err {
            CartCookieError::TooManyLines { .. } | CartCookieError::TooLarge { .. } => {
                Self::BadRequest(err.to_string())
            }
            CartCookieError::Encoding(_) | CartCookieError::Json(_) => {
                Self::Internal(format!("cart cookie: {err}"))
            }
        }
    }
}

/// Malformed or mistyped JSON bodies are client errors.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::BadRequest(msg) | Self::Conflict(msg) => msg.clone(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a seller ID.
///
/// Call this after the seller session is resolved to associate errors with
/// the seller.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}
