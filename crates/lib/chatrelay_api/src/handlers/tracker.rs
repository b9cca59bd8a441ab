//! Conversation tracker lookup.

use axum::Json;
use axum::extract::{Path, State};
use tracing::error;

use crate::AppState;
use crate::error::{AppError, AppResult};

/// `GET /conversations/{sender}/tracker` — relay the backend's tracker for `sender`.
pub async fn tracker_handler(
    State(state): State<AppState>,
    Path(sender): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let sender = chatrelay_core::message::require("sender", Some(sender))?;

    let tracker = state.client.tracker(&sender).await.map_err(|e| {
        error!(sender = %sender, error = %e, "error fetching conversation tracker");
        AppError::backend("Error fetching conversation tracker", e)
    })?;

    Ok(Json(tracker))
}
