// src/chat/mod.rs
//! Conversation types and the per-exchange orchestrator.

pub mod service;

use serde::{Deserialize, Serialize};

pub use service::ChatService;

/// One message in a conversation. Immutable once created; order in a
/// transcript is the conversation timeline. Extra fields supplied by the
/// transport layer (timestamps, metadata, ...) are dropped on deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: String,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// The ordered turn log for one identity.
pub type Transcript = Vec<Turn>;
