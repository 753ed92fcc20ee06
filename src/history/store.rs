// src/history/store.rs
//! Durable per-identity transcript log: one JSON file per user under a
//! single directory, full overwrite on every save (last-writer-wins, no
//! merge). Concurrent saves for the same identity are not serialized here;
//! callers are expected to keep one writer per identity.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::chat::Transcript;
use crate::error::StorageError;

#[derive(Debug, Clone)]
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Overwrite the persisted transcript for `identity`, creating the
    /// storage directory on first use. Idempotent.
    pub async fn save(&self, identity: &str, transcript: &Transcript) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(identity);
        let bytes = serde_json::to_vec(transcript)?;
        fs::write(&path, bytes).await?;
        debug!("saved {} turns for {}", transcript.len(), identity);
        Ok(())
    }

    /// Load the persisted transcript. A brand-new user has no history, so a
    /// missing file is an empty transcript, not an error.
    pub async fn load(&self, identity: &str) -> Result<Transcript, StorageError> {
        match fs::read(self.path_for(identity)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Transcript::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// Whether a transcript has ever been saved for `identity`.
    pub async fn exists(&self, identity: &str) -> bool {
        fs::try_exists(self.path_for(identity)).await.unwrap_or(false)
    }

    fn path_for(&self, identity: &str) -> PathBuf {
        self.dir
            .join(format!("{}_chat_history.json", sanitize_identity(identity)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Map an identity string to a filesystem-safe file stem. Emails pass
/// through mostly unchanged; path separators and other hostile characters
/// become underscores so an identity can never escape the storage dir.
fn sanitize_identity(identity: &str) -> String {
    identity
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '@' | '.' | '-' | '+' => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Turn;
    use tempfile::TempDir;

    fn sample_transcript() -> Transcript {
        vec![
            Turn::user("hi"),
            Turn::assistant("hello"),
            Turn::user("how are you"),
        ]
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::new(tmp.path().join("history"));

        let transcript = sample_transcript();
        store.save("alice@example.com", &transcript).await.unwrap();

        let loaded = store.load("alice@example.com").await.unwrap();
        assert_eq!(loaded, transcript);
    }

    #[tokio::test]
    async fn load_without_save_is_empty_not_error() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::new(tmp.path());

        let loaded = store.load("nobody@example.com").await.unwrap();
        assert!(loaded.is_empty());
        assert!(!store.exists("nobody@example.com").await);
    }

    #[tokio::test]
    async fn double_save_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::new(tmp.path());

        let transcript = sample_transcript();
        store.save("bob@example.com", &transcript).await.unwrap();
        store.save("bob@example.com", &transcript).await.unwrap();

        let loaded = store.load("bob@example.com").await.unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded, transcript);
    }

    #[tokio::test]
    async fn save_overwrites_previous_transcript() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::new(tmp.path());

        store.save("carol@example.com", &vec![Turn::user("first")]).await.unwrap();
        let replacement = sample_transcript();
        store.save("carol@example.com", &replacement).await.unwrap();

        assert_eq!(store.load("carol@example.com").await.unwrap(), replacement);
    }

    #[tokio::test]
    async fn identities_do_not_collide_or_escape_the_dir() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::new(tmp.path());

        store.save("../evil", &vec![Turn::user("x")]).await.unwrap();
        store.save("dave@example.com", &vec![Turn::user("y")]).await.unwrap();

        // The hostile identity landed inside the dir, under a mangled name.
        assert!(tmp.path().join(".._evil_chat_history.json").exists());
        assert_eq!(store.load("dave@example.com").await.unwrap().len(), 1);
    }

    #[test]
    fn sanitize_keeps_emails_readable() {
        assert_eq!(
            sanitize_identity("alice@example.com"),
            "alice@example.com"
        );
        assert_eq!(sanitize_identity("a/b\\c"), "a_b_c");
    }
}
