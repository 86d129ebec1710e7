// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider client (Firebase Authentication, Identity Toolkit REST).
//!
//! Handles:
//! - Email/password sign-up and sign-in
//! - Sign-in with an OAuth identity provider token (Google)
//! - Display name updates
//! - Sign-out and session change notifications

use crate::config::Config;
use crate::error::{AppError, AuthErrorCode, Result};
use crate::models::Identity;
use crate::services::session::SessionState;
use serde::Deserialize;
use tokio::sync::{watch, Mutex};

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
/// Provider id for Google sign-in through [`IdentityProvider::sign_in_with_idp`].
pub const GOOGLE_PROVIDER_ID: &str = "google.com";

/// Account operations and session notifications of an identity provider.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and sign it in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity>;

    /// Set the display name of the signed-in account.
    async fn update_display_name(&self, display_name: &str) -> Result<Identity>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity>;

    /// Sign in with an ID token issued by an OAuth provider such as `google.com`.
    async fn sign_in_with_idp(&self, provider_id: &str, id_token: &str) -> Result<Identity>;

    async fn sign_out(&self) -> Result<()>;

    /// Session notifications. Every change replaces the whole state.
    fn session_changes(&self) -> watch::Receiver<SessionState>;
}

/// Firebase Authentication over the Identity Toolkit REST API.
pub struct FirebaseAuth {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    /// ID token of the signed-in account, needed for profile updates
    id_token: Mutex<Option<String>>,
    session: watch::Sender<SessionState>,
}

impl FirebaseAuth {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        // Sessions are not persisted across runs, so the state is known at once.
        let (session, _) = watch::channel(SessionState::Ready(None));
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            id_token: Mutex::new(None),
            session,
        }
    }

    /// Build from config, pointing at the Auth emulator when configured.
    pub fn from_config(config: &Config) -> Self {
        let base_url = match &config.firebase_auth_emulator_host {
            Some(host) => {
                tracing::info!(host = %host, "Using Firebase Auth emulator");
                format!("http://{}/identitytoolkit.googleapis.com/v1", host)
            }
            None => IDENTITY_TOOLKIT_URL.to_string(),
        };
        Self::new(config.firebase_api_key.clone(), base_url)
    }

    /// POST to an `accounts:*` endpoint and parse the account response.
    async fn post_account(
        &self,
        endpoint: &str,
        body: serde_json::Value,
    ) -> Result<AccountResponse> {
        let url = format!("{}/accounts:{}", self.base_url, endpoint);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Identity request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(parse_error_body(status.as_u16(), &body));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Network(format!("Failed to parse identity response: {}", e)))
    }

    /// Record the new session and notify subscribers.
    async fn establish(&self, account: AccountResponse) -> Identity {
        let identity = account.identity();
        if let Some(token) = account.id_token {
            *self.id_token.lock().await = Some(token);
        }
        self.session
            .send_replace(SessionState::Ready(Some(identity.clone())));
        identity
    }
}

#[async_trait::async_trait]
impl IdentityProvider for FirebaseAuth {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity> {
        let account = self
            .post_account(
                "signUp",
                serde_json::json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        tracing::info!(identity_id = %account.local_id, "Account created");
        Ok(self.establish(account).await)
    }

    async fn update_display_name(&self, display_name: &str) -> Result<Identity> {
        let id_token = self
            .id_token
            .lock()
            .await
            .clone()
            .ok_or_else(|| AppError::Auth(AuthErrorCode::Other("auth/no-current-user".into())))?;

        let account = self
            .post_account(
                "update",
                serde_json::json!({
                    "idToken": id_token,
                    "displayName": display_name,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        Ok(self.establish(account).await)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        let account = self
            .post_account(
                "signInWithPassword",
                serde_json::json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        tracing::info!(identity_id = %account.local_id, "Signed in with password");
        Ok(self.establish(account).await)
    }

    async fn sign_in_with_idp(&self, provider_id: &str, id_token: &str) -> Result<Identity> {
        let post_body = format!("id_token={}&providerId={}", id_token, provider_id);
        let account = self
            .post_account(
                "signInWithIdp",
                serde_json::json!({
                    "postBody": post_body,
                    "requestUri": "http://localhost",
                    "returnIdpCredential": true,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        tracing::info!(
            identity_id = %account.local_id,
            provider = provider_id,
            "Signed in with identity provider"
        );
        Ok(self.establish(account).await)
    }

    async fn sign_out(&self) -> Result<()> {
        *self.id_token.lock().await = None;
        self.session.send_replace(SessionState::Ready(None));
        tracing::info!("Signed out");
        Ok(())
    }

    fn session_changes(&self) -> watch::Receiver<SessionState> {
        self.session.subscribe()
    }
}

/// Account fields shared by the `accounts:*` responses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
}

impl AccountResponse {
    fn identity(&self) -> Identity {
        Identity {
            id: self.local_id.clone(),
            display_name: self.display_name.clone().filter(|n| !n.is_empty()),
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Map an error response to an auth code, or a network error when the body
/// is not the provider's error envelope.
fn parse_error_body(status: u16, body: &str) -> AppError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let code = AuthErrorCode::from_provider_code(&envelope.error.message);
            tracing::warn!(status, code = %code, "Identity provider rejected request");
            AppError::Auth(code)
        }
        Err(_) => AppError::Network(format!("HTTP {}: {}", status, body)),
    }
}
