use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provider-issued proof of an authenticated identity.
///
/// Owned by the auth provider; UI code only looks at whether one exists and
/// which email it carries.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub email: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("id_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Email/password pair captured from the sign-in form.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Validates raw form input. Both fields must be non-empty after
    /// trimming; the email is stored trimmed, the password as typed.
    pub fn from_form(email: &str, password: &str) -> Result<Self, ValidationError> {
        let email = email.trim();
        match (email.is_empty(), password.trim().is_empty()) {
            (true, true) => Err(ValidationError::MissingEmailAndPassword),
            (true, false) => Err(ValidationError::MissingEmail),
            (false, true) => Err(ValidationError::MissingPassword),
            (false, false) => Ok(Self {
                email: email.to_string(),
                password: password.to_string(),
            }),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    SignedOut,
    SignedIn,
}

impl ViewState {
    pub fn from_session(session: Option<&Session>) -> Self {
        if session.is_some() {
            Self::SignedIn
        } else {
            Self::SignedOut
        }
    }
}
