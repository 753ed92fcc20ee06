// src/auth/mod.rs
//! Identity: a provider client, the in-process session cell, and the
//! background refresh loop that keeps a long-running session valid.

pub mod provider;
pub mod refresher;
pub mod session;

pub use provider::{IdentityProvider, ProviderSession, SupabaseAuthClient};
pub use refresher::spawn_session_refresher;
pub use session::SessionStore;
