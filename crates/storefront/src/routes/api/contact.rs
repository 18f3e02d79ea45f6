//! Customer contact API.

use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::instrument;

use crate::db::ContactRepository;
use crate::error::Result;
use crate::middleware::ApiJson;
use crate::services::{ContactForm, contact};
use crate::state::AppState;

/// Store a customer contact message.
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<ContactForm>,
) -> Result<Json<Value>> {
    contact::submit(&ContactRepository::new(state.pool()), &form).await?;
    Ok(Json(json!({ "success": true })))
}
