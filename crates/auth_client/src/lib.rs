use std::{
    sync::{PoisonError, RwLock},
    time::Duration,
};

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::Client;
use shared::{
    domain::{Credentials, Session, UserId},
    error::{AuthError, AuthErrorCode},
    protocol::{PasswordAuthRequest, PasswordAuthResponse, ProviderErrorEnvelope},
};
use tracing::{info, warn};

pub mod config;
mod session_store;

pub use config::{load_settings, AuthSettings, SettingsOverrides};
pub use session_store::SessionStore;

const SIGN_IN_ENDPOINT: &str = "signInWithPassword";
const SIGN_UP_ENDPOINT: &str = "signUp";

/// Identity provider operations the UI depends on.
///
/// `current_session` and `sign_out` are synchronous so they can be called
/// straight from a render pass; the two network operations are async.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    fn current_session(&self) -> Option<Session>;
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError>;
    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, AuthError>;
    fn sign_out(&self) -> Result<(), AuthError>;
}

/// Email/password auth against the Identity Toolkit REST API.
pub struct IdentityToolkitClient {
    http: Client,
    base_url: String,
    api_key: String,
    store: SessionStore,
    current: RwLock<Option<Session>>,
}

impl IdentityToolkitClient {
    /// Builds the client and restores any persisted session.
    pub fn new(settings: &AuthSettings) -> anyhow::Result<Self> {
        settings.validate()?;
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .context("failed to build http client")?;
        let store = SessionStore::new(settings.session_path.clone());

        let restored = match store.load() {
            Ok(session) => session,
            Err(err) => {
                warn!(
                    path = %store.path().display(),
                    "discarding unreadable persisted session: {err:#}"
                );
                None
            }
        };
        if let Some(session) = &restored {
            info!(
                user_id = %session.user_id,
                id_token_expired = session.is_expired_at(Utc::now()),
                "restored persisted session"
            );
        }

        Ok(Self {
            http,
            base_url: settings.auth_base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            store,
            current: RwLock::new(restored),
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/v1/accounts:{endpoint}", self.base_url)
    }

    async fn password_auth(
        &self,
        endpoint: &str,
        credentials: &Credentials,
    ) -> Result<Session, AuthError> {
        let res = self
            .http
            .post(self.endpoint_url(endpoint))
            .query(&[("key", self.api_key.as_str())])
            .json(&PasswordAuthRequest {
                email: credentials.email.clone(),
                password: credentials.password.clone(),
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|err| AuthError::network(err.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<ProviderErrorEnvelope>(&body) {
                Ok(envelope) => AuthError::from_provider_message(envelope.error.message),
                Err(_) => AuthError::new(
                    AuthErrorCode::Unknown,
                    format!("identity provider returned {status}"),
                ),
            });
        }

        let body: PasswordAuthResponse = res.json().await.map_err(|err| {
            AuthError::new(
                AuthErrorCode::Unknown,
                format!("malformed identity provider response: {err}"),
            )
        })?;
        let session = session_from_response(body, Utc::now())?;
        self.install_session(session.clone());
        Ok(session)
    }

    fn install_session(&self, session: Session) {
        // The in-memory session stays authoritative even if persisting fails;
        // the user is signed in for this run either way.
        if let Err(err) = self.store.save(&session) {
            warn!(user_id = %session.user_id, "failed to persist session: {err:#}");
        }
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }
}

#[async_trait]
impl AuthProvider for IdentityToolkitClient {
    fn current_session(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let session = self.password_auth(SIGN_IN_ENDPOINT, credentials).await?;
        info!(user_id = %session.user_id, "signed in");
        Ok(session)
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let session = self.password_auth(SIGN_UP_ENDPOINT, credentials).await?;
        info!(user_id = %session.user_id, "created account");
        Ok(session)
    }

    fn sign_out(&self) -> Result<(), AuthError> {
        // Persisted state goes first: if it cannot be removed the session is
        // still live and must stay visible as such.
        self.store
            .clear()
            .map_err(|err| AuthError::storage(format!("{err:#}")))?;
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(session) = previous {
            info!(user_id = %session.user_id, "signed out");
        }
        Ok(())
    }
}

fn session_from_response(
    body: PasswordAuthResponse,
    now: DateTime<Utc>,
) -> Result<Session, AuthError> {
    let invalid_lifetime = || {
        AuthError::new(
            AuthErrorCode::Unknown,
            format!("invalid token lifetime '{}'", body.expires_in),
        )
    };
    let lifetime = body
        .expires_in
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(invalid_lifetime)?;
    let expires_at = now
        .checked_add_signed(lifetime)
        .ok_or_else(invalid_lifetime)?;

    Ok(Session {
        user_id: UserId(body.local_id),
        email: body.email.filter(|email| !email.is_empty()),
        id_token: body.id_token,
        refresh_token: body.refresh_token,
        expires_at,
    })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
