//! # chatrelay_api
//!
//! HTTP API library for chatrelay.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use chatrelay_core::messaging::MessagingClient;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{health, message, tracker};

/// Route paths served by [`router`].
pub mod routes {
    pub const POST_MESSAGE: &str = "/message";
    pub const GET_CONVERSATION_TRACKER: &str = "/conversations/{sender}/tracker";
    pub const GET_API_HEALTH: &str = "/api/health";
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Client for the conversational backend.
    pub client: Arc<dyn MessagingClient>,
    /// API configuration.
    pub config: ApiConfig,
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(routes::POST_MESSAGE, post(message::send_message_handler))
        .route(
            routes::GET_CONVERSATION_TRACKER,
            get(tracker::tracker_handler),
        )
        .route(routes::GET_API_HEALTH, get(health::health_handler))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
