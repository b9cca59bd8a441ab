//! Health endpoint — reports version and backend reachability.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::AppState;
use crate::models::HealthResponse;

/// `GET /api/health` — always 200; probes the backend once.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let backend_error = match state.client.status().await {
        Ok(()) => None,
        Err(e) => {
            warn!("Backend status check failed: {e}");
            Some(e.to_string())
        }
    };

    Json(HealthResponse {
        version: chatrelay_core::version().to_string(),
        backend_available: backend_error.is_none(),
        backend_error,
    })
}
