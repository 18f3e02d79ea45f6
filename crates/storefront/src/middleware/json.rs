//! JSON request bodies that fail like every other client error.
//!
//! axum's own `Json` rejects a malformed or mistyped body with a plain-text
//! 400 or 422. [`ApiJson`] routes the rejection through [`AppError`] so the
//! client always gets a 400 with a `{"error": ...}` body.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `Json<T>` whose rejection is `AppError::BadRequest`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
