// src/llm/client.rs

//! Low-level client for an OpenAI-compatible chat-completions endpoint
//! (Groq in production). No wrappers; just reqwest and Rust.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::chat::Turn;
use crate::error::UpstreamError;

/// The seam the orchestrator talks through; production uses [`GroqClient`],
/// tests substitute a double.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Submit `prior` followed by a new user turn carrying `message`;
    /// return the generated assistant text.
    async fn complete(&self, prior: &[Turn], message: &str) -> Result<String, UpstreamError>;
}

#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl GroqClient {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            api_base: api_base.into(),
            model: model.into(),
        }
    }

    fn auth_header(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.api_key))
    }
}

#[async_trait]
impl CompletionBackend for GroqClient {
    async fn complete(&self, prior: &[Turn], message: &str) -> Result<String, UpstreamError> {
        let url = format!("{}/chat/completions", self.api_base);

        // Full conversational context: prior turns, then the new user turn.
        // With no prior turns this degenerates to a one-message context.
        let mut messages: Vec<serde_json::Value> = prior
            .iter()
            .map(|t| json!({"role": t.role, "content": t.content}))
            .collect();
        messages.push(json!({"role": "user", "content": message}));

        debug!("completion request: {} messages, model {}", messages.len(), self.model);

        let body = json!({
            "model": self.model,
            "messages": messages,
        });

        let resp = self
            .client
            .post(&url)
            .header(self.auth_header().0, self.auth_header().1.clone())
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        let resp_json: serde_json::Value = resp.json().await?;
        let content = resp_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                UpstreamError::Malformed("no message content in completion response".to_string())
            })?;

        Ok(content.to_string())
    }
}
