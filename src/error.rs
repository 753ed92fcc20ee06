// src/error.rs
//! Domain error taxonomy. Everything here is fatal to a single request at
//! most; conversion to an HTTP response happens in `api::error`.

use thiserror::Error;

/// Identity-provider failures. Never escapes the auth layer: `authenticate`
/// maps these to `false` and `current_identity` to `None`, logging the cause.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no active session")]
    NoSession,

    #[error("session has no refresh token")]
    NoRefreshToken,

    #[error("identity provider rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("identity provider transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed identity provider response: {0}")]
    Malformed(String),
}

/// Remote completion call failed. Surfaced to the caller as an error turn,
/// never a crash; the transcript persisted before the call is retained.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("completion endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion endpoint transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed completion response: {0}")]
    Malformed(String),
}

/// Transcript storage failed (filesystem unavailable or unwritable, or a
/// corrupt transcript file).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("transcript io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transcript serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// What a single chat exchange can fail with.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("user not authenticated")]
    Unauthenticated,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
