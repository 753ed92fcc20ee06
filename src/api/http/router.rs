// src/api/http/router.rs
// HTTP router composition for REST API endpoints

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use super::{
    chat::{chat_handler, get_history_handler, login_handler},
    handlers::health_handler,
};
use crate::state::AppState;

/// Main HTTP router: health, login, chat, and history endpoints.
pub fn http_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(health_handler))

        // Auth
        .route("/login", post(login_handler))

        // Chat
        .route("/chat", post(chat_handler))
        .route("/get-history", post(get_history_handler))

        .with_state(app_state)
}
