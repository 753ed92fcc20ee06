// src/main.rs

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use yesman::api::http_router;
use yesman::auth::{SupabaseAuthClient, spawn_session_refresher};
use yesman::config::CONFIG;
use yesman::llm::GroqClient;
use yesman::state::create_app_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(CONFIG.log_level.parse::<Level>().unwrap_or(Level::INFO))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Yes-Man backend");
    info!("Model: {}", CONFIG.model);
    info!("History dir: {}", CONFIG.history_dir);
    if CONFIG.groq_api_key.is_empty() {
        error!("GROQ_API_KEY is not set; completion calls will be rejected upstream");
    }

    let provider = Arc::new(SupabaseAuthClient::new(
        CONFIG.supabase_url.clone(),
        CONFIG.supabase_key.clone(),
    ));
    let completion = Arc::new(GroqClient::new(
        CONFIG.groq_base_url.clone(),
        CONFIG.groq_api_key.clone(),
        CONFIG.model.clone(),
    ));

    let app_state = Arc::new(create_app_state(
        provider,
        completion,
        CONFIG.history_dir.clone().into(),
        CONFIG.session_stale_margin_secs,
    ));

    // Keep the session alive across long-running conversations.
    let refresher_handle = spawn_session_refresher(
        app_state.session_store.clone(),
        Duration::from_secs(CONFIG.session_refresh_secs),
    );
    info!(
        "Session refresher started - running every {} seconds",
        CONFIG.session_refresh_secs
    );

    let cors = if CONFIG.cors_origin == "*" {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(CONFIG.cors_origin.parse::<HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = http_router(app_state).layer(cors);

    let bind_address = CONFIG.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Server listening on http://{}", bind_address);

    let server_future = axum::serve(listener, app).into_future();

    // Run server and session refresher concurrently
    tokio::select! {
        result = server_future => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = refresher_handle => {
            error!("Session refresher unexpectedly terminated");
        }
    }

    Ok(())
}
