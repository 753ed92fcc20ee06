// src/chat/service.rs

//! Session Orchestrator: the state machine for one chat exchange.
//!
//! Identity is resolved once at the HTTP boundary and threaded in
//! explicitly; this service never looks it up ambiently. Persistence
//! policy: the transcript including the just-submitted user turn is saved
//! before the completion call (the user's words survive a crash
//! mid-completion), and saved again once the assistant turn is known so a
//! reloaded transcript is complete. On upstream failure there is no second
//! save: disk keeps exactly the pre-completion turns.

use std::sync::Arc;

use tracing::{error, info};

use crate::chat::{Transcript, Turn};
use crate::error::ChatError;
use crate::history::HistoryStore;
use crate::llm::CompletionBackend;

pub struct ChatService {
    history: Arc<HistoryStore>,
    completion: Arc<dyn CompletionBackend>,
}

impl ChatService {
    pub fn new(history: Arc<HistoryStore>, completion: Arc<dyn CompletionBackend>) -> Self {
        Self {
            history,
            completion,
        }
    }

    /// Run one exchange for `identity`: append the user turn to the
    /// caller-supplied history, persist, ask the completion backend for the
    /// reply, persist again, return the reply.
    ///
    /// `history` arrives already stripped to role/content by deserialization.
    pub async fn chat(
        &self,
        identity: &str,
        history: Transcript,
        message: &str,
    ) -> Result<String, ChatError> {
        let mut transcript = history;
        transcript.push(Turn::user(message));

        // Optimistic persist: the user's turn hits disk before the reply is
        // known. A crash past this point loses only the assistant turn.
        self.history.save(identity, &transcript).await?;

        let prior = &transcript[..transcript.len() - 1];
        let reply = match self.completion.complete(prior, message).await {
            Ok(reply) => reply,
            Err(err) => {
                error!("completion failed for {}: {err:#}", identity);
                return Err(err.into());
            }
        };

        transcript.push(Turn::assistant(&reply));
        self.history.save(identity, &transcript).await?;

        info!(
            "chat exchange complete for {} ({} turns on disk)",
            identity,
            transcript.len()
        );
        Ok(reply)
    }

    /// The persisted transcript for `identity`, empty for a new user.
    pub async fn load_history(&self, identity: &str) -> Result<Transcript, ChatError> {
        Ok(self.history.load(identity).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpstreamError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records the context of every call; optionally fails.
    struct RecordingBackend {
        seen: Mutex<Vec<Vec<Turn>>>,
        reply: Option<String>,
    }

    impl RecordingBackend {
        fn replying(reply: &str) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                reply: Some(reply.to_string()),
            }
        }

        fn failing() -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                reply: None,
            }
        }
    }

    #[async_trait]
    impl CompletionBackend for RecordingBackend {
        async fn complete(&self, prior: &[Turn], message: &str) -> Result<String, UpstreamError> {
            let mut context = prior.to_vec();
            context.push(Turn::user(message));
            self.seen.lock().unwrap().push(context);
            match &self.reply {
                Some(reply) => Ok(reply.clone()),
                None => Err(UpstreamError::Status {
                    status: 429,
                    body: "rate limit exceeded".to_string(),
                }),
            }
        }
    }

    fn two_turn_history() -> Transcript {
        vec![Turn::user("hi"), Turn::assistant("hello")]
    }

    #[tokio::test]
    async fn backend_sees_full_context_ending_in_new_user_turn() {
        let tmp = TempDir::new().unwrap();
        let backend = Arc::new(RecordingBackend::replying("doing great"));
        let service = ChatService::new(
            Arc::new(HistoryStore::new(tmp.path())),
            backend.clone(),
        );

        let reply = service
            .chat("alice@example.com", two_turn_history(), "how are you")
            .await
            .unwrap();
        assert_eq!(reply, "doing great");

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let context = &seen[0];
        assert_eq!(context.len(), 3);
        assert_eq!(context[2], Turn::user("how are you"));
    }

    #[tokio::test]
    async fn successful_exchange_persists_the_assistant_turn() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(HistoryStore::new(tmp.path()));
        let service = ChatService::new(store.clone(), Arc::new(RecordingBackend::replying("yes!")));

        service
            .chat("alice@example.com", two_turn_history(), "how are you")
            .await
            .unwrap();

        let saved = store.load("alice@example.com").await.unwrap();
        assert_eq!(saved.len(), 4);
        assert_eq!(saved[3], Turn::assistant("yes!"));
    }

    #[tokio::test]
    async fn upstream_failure_leaves_the_pre_completion_transcript() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(HistoryStore::new(tmp.path()));
        let service = ChatService::new(store.clone(), Arc::new(RecordingBackend::failing()));

        let err = service
            .chat("alice@example.com", two_turn_history(), "how are you")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Upstream(_)));

        // The optimistic save happened; the assistant turn did not.
        let saved = store.load("alice@example.com").await.unwrap();
        assert_eq!(saved.len(), 3);
        assert_eq!(saved[2], Turn::user("how are you"));
    }

    #[tokio::test]
    async fn empty_history_degenerates_to_a_single_turn_context() {
        let tmp = TempDir::new().unwrap();
        let backend = Arc::new(RecordingBackend::replying("welcome"));
        let service = ChatService::new(
            Arc::new(HistoryStore::new(tmp.path())),
            backend.clone(),
        );

        service
            .chat("new@example.com", Transcript::new(), "first message")
            .await
            .unwrap();

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen[0], vec![Turn::user("first message")]);
    }
}
