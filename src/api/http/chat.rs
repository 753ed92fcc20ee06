// src/api/http/chat.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::chat::{Transcript, Turn};
use crate::error::ChatError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Prior turns as the client saw them; extra per-turn fields from the
    /// transport layer are dropped during deserialization.
    #[serde(default)]
    pub history: Vec<Turn>,
    #[serde(default)]
    pub user_email: Option<String>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
}

#[derive(Deserialize)]
pub struct HistoryRequest {
    #[serde(default)]
    pub user_email: Option<String>,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub history: Transcript,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Resolve the caller's identity exactly once, at the boundary: an explicit
/// `user_email` in the request wins, a live process-local session is the
/// fallback, neither means 401.
async fn resolve_identity(
    app_state: &AppState,
    user_email: Option<&str>,
) -> Result<String, ChatError> {
    if let Some(email) = user_email.filter(|e| !e.trim().is_empty()) {
        return Ok(email.to_string());
    }
    app_state
        .session_store
        .current_identity()
        .await
        .ok_or(ChatError::Unauthenticated)
}

pub async fn chat_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    let result: ApiResult<_> = async {
        let identity = resolve_identity(&app_state, request.user_email.as_deref()).await?;
        info!(
            "chat request for {} ({} prior turns)",
            identity,
            request.history.len()
        );

        let reply = app_state
            .chat_service
            .chat(&identity, request.history, &request.message)
            .await?;

        Ok(Json(ChatResponse {
            success: true,
            response: reply,
        }))
    }
    .await;

    match result {
        Ok(response) => response.into_response(),
        Err(error) => error.into_response(),
    }
}

pub async fn get_history_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<HistoryRequest>,
) -> impl IntoResponse {
    let result: ApiResult<_> = async {
        let identity = resolve_identity(&app_state, request.user_email.as_deref()).await?;

        if !app_state.history_store.exists(&identity).await {
            return Err(ApiError::not_found("No chat history found"));
        }

        let history = app_state.history_store.load(&identity).await?;
        info!("loaded {} turns for {}", history.len(), identity);

        Ok(Json(HistoryResponse {
            success: true,
            history,
        }))
    }
    .await;

    match result {
        Ok(response) => response.into_response(),
        Err(error) => error.into_response(),
    }
}

pub async fn login_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    let result: ApiResult<_> = async {
        if app_state
            .session_store
            .authenticate(&request.email, &request.password)
            .await
        {
            Ok(Json(json!({"success": true})))
        } else {
            Err(ApiError::unauthorized("Invalid login credentials"))
        }
    }
    .await;

    match result {
        Ok(response) => response.into_response(),
        Err(error) => error.into_response(),
    }
}
