// src/auth/refresher.rs
//! Background session refresh loop.
//!
//! Runs for the lifetime of the process, independent of any conversation.
//! The interval must stay strictly shorter than the provider's token
//! lifetime (50 minutes against a 60-minute token leaves room to absorb a
//! missed cycle). Failures are logged and retried on the next tick; the
//! loop never exits on error.

use std::{sync::Arc, time::Duration};

use tracing::{info, warn};

use crate::auth::session::SessionStore;

/// Spawn the background refresh task.
///
/// `interval` is the time between refresh attempts (e.g., 50m).
pub fn spawn_session_refresher(
    store: Arc<SessionStore>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately; skip it so the cadence is
        // one refresh per elapsed interval.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match store.refresh_now().await {
                Ok(()) => info!("session refreshed"),
                Err(err) => warn!("session refresh failed: {err:#}"),
            }
        }
    })
}
