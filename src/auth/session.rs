// src/auth/session.rs

//! The session cell: pairs an identity with its credential and expiry.
//! Request handlers read it, `authenticate` and the refresh loop write it;
//! the RwLock keeps readers from ever seeing a half-updated token/expiry
//! pair. Credentials live only in memory and die with the process.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::auth::provider::{IdentityProvider, ProviderSession};
use crate::error::AuthError;

#[derive(Debug, Clone)]
pub struct Session {
    pub identity: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    fn from_provider(ps: ProviderSession) -> Self {
        Self {
            identity: ps.email,
            access_token: ps.access_token,
            refresh_token: ps.refresh_token,
            expires_at: Utc::now() + Duration::seconds(ps.expires_in as i64),
        }
    }
}

pub struct SessionStore {
    provider: Arc<dyn IdentityProvider>,
    session: RwLock<Option<Session>>,
    /// A session within this margin of its expiry counts as stale.
    stale_margin: Duration,
}

impl SessionStore {
    pub fn new(provider: Arc<dyn IdentityProvider>, stale_margin_secs: u64) -> Self {
        Self {
            provider,
            session: RwLock::new(None),
            stale_margin: Duration::seconds(stale_margin_secs as i64),
        }
    }

    /// Sign in against the identity provider. Never errors: any rejection
    /// or transport failure is logged and reported as `false`.
    pub async fn authenticate(&self, email: &str, password: &str) -> bool {
        match self.provider.sign_in_with_password(email, password).await {
            Ok(ps) => {
                let session = Session::from_provider(ps);
                info!("signed in as {}", session.identity);
                *self.session.write().await = Some(session);
                true
            }
            Err(err) => {
                warn!("authentication failed: {err:#}");
                false
            }
        }
    }

    /// The signed-in identity, if the session is live. A stale session gets
    /// exactly one refresh attempt first; a fresh one costs no network
    /// call.
    pub async fn current_identity(&self) -> Option<String> {
        {
            let guard = self.session.read().await;
            match guard.as_ref() {
                None => return None,
                Some(s) if !self.is_stale(s) => return Some(s.identity.clone()),
                Some(_) => {}
            }
        }

        match self.refresh_now().await {
            Ok(()) => {
                let guard = self.session.read().await;
                guard.as_ref().map(|s| s.identity.clone())
            }
            Err(err) => {
                warn!("stale session refresh failed: {err:#}");
                None
            }
        }
    }

    /// Exchange the refresh token for a new credential and install it.
    pub async fn refresh_now(&self) -> Result<(), AuthError> {
        let refresh_token = {
            let guard = self.session.read().await;
            let session = guard.as_ref().ok_or(AuthError::NoSession)?;
            session
                .refresh_token
                .clone()
                .ok_or(AuthError::NoRefreshToken)?
        };

        let ps = self.provider.refresh(&refresh_token).await?;
        *self.session.write().await = Some(Session::from_provider(ps));
        Ok(())
    }

    /// Drop the session. Subsequent `current_identity` calls return None.
    pub async fn sign_out(&self) {
        *self.session.write().await = None;
    }

    fn is_stale(&self, session: &Session) -> bool {
        Utc::now() + self.stale_margin >= session.expires_at
    }
}
