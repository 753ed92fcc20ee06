// src/state.rs

use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    auth::{IdentityProvider, SessionStore},
    chat::ChatService,
    history::HistoryStore,
    llm::CompletionBackend,
};

/// Shared service handles for the HTTP layer. Everything is explicitly
/// constructed and injectable; no ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub session_store: Arc<SessionStore>,
    pub history_store: Arc<HistoryStore>,
    pub chat_service: Arc<ChatService>,
}

/// Assemble the state from its collaborators. Tests hand in doubles for the
/// identity provider and completion backend.
pub fn create_app_state(
    provider: Arc<dyn IdentityProvider>,
    completion: Arc<dyn CompletionBackend>,
    history_dir: PathBuf,
    stale_margin_secs: u64,
) -> AppState {
    let session_store = Arc::new(SessionStore::new(provider, stale_margin_secs));
    let history_store = Arc::new(HistoryStore::new(history_dir));
    let chat_service = Arc::new(ChatService::new(history_store.clone(), completion));

    AppState {
        session_store,
        history_store,
        chat_service,
    }
}
