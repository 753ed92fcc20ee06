// src/auth/provider.rs

//! Identity-provider client speaking the Supabase (GoTrue-style) token API.
//! The provider is an opaque network service: request/response shape and
//! failure-as-error is the whole contract.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::error::AuthError;

/// What a successful sign-in or refresh yields.
#[derive(Debug, Clone)]
pub struct ProviderSession {
    pub email: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Token lifetime in seconds (provider default: one hour).
    pub expires_in: u64,
}

/// Injectable seam over the identity provider, so the session store and its
/// tests never depend on a live endpoint.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, AuthError>;

    async fn refresh(&self, refresh_token: &str) -> Result<ProviderSession, AuthError>;
}

#[derive(Clone)]
pub struct SupabaseAuthClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseAuthClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn token_request(&self, grant_type: &str, body: serde_json::Value) -> Result<ProviderSession, AuthError> {
        let url = format!("{}/auth/v1/token?grant_type={}", self.base_url, grant_type);
        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        let resp_json: serde_json::Value = resp.json().await?;
        let access_token = resp_json["access_token"]
            .as_str()
            .ok_or_else(|| AuthError::Malformed("no access_token in provider response".to_string()))?
            .to_string();
        let email = resp_json["user"]["email"]
            .as_str()
            .ok_or_else(|| AuthError::Malformed("no user email in provider response".to_string()))?
            .to_string();
        let refresh_token = resp_json["refresh_token"].as_str().map(str::to_owned);
        let expires_in = resp_json["expires_in"].as_u64().unwrap_or(3600);

        Ok(ProviderSession {
            email,
            access_token,
            refresh_token,
            expires_in,
        })
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAuthClient {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, AuthError> {
        self.token_request("password", json!({"email": email, "password": password}))
            .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<ProviderSession, AuthError> {
        self.token_request("refresh_token", json!({"refresh_token": refresh_token}))
            .await
    }
}
