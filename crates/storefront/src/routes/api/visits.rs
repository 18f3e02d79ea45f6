//! Store visit beacon.
//!
//! Browsers fire this and forget it, so it always answers 204. The write
//! happens after the response on a spawned task and its failures only reach
//! the debug log.

use axum::{body::Bytes, extract::State, http::StatusCode};
use serde::Deserialize;

use thriftbox_core::StoreId;

use crate::db::visits;
use crate::state::AppState;

/// Beacon payload.
#[derive(Debug, Deserialize)]
pub struct VisitBeacon {
    pub store_id: StoreId,
    pub path: Option<String>,
}

/// Record a store page view.
pub async fn record(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let beacon: VisitBeacon = match serde_json::from_slice(&body) {
        Ok(beacon) => beacon,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring malformed visit beacon");
            return StatusCode::NO_CONTENT;
        }
    };

    tokio::spawn(async move {
        if let Err(e) =
            visits::record_visit(state.pool(), beacon.store_id, beacon.path.as_deref()).await
        {
            tracing::debug!(error = %e, store_id = %beacon.store_id, "Visit not recorded");
        }
    });

    StatusCode::NO_CONTENT
}
