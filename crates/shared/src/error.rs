use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthErrorCode {
    EmailNotFound,
    InvalidPassword,
    InvalidCredentials,
    EmailExists,
    WeakPassword,
    InvalidEmail,
    MissingPassword,
    UserDisabled,
    TooManyAttempts,
    OperationNotAllowed,
    Network,
    Storage,
    Unknown,
}

impl AuthErrorCode {
    /// Maps an identity provider error message onto a code.
    ///
    /// Provider messages look like `EMAIL_EXISTS` or
    /// `WEAK_PASSWORD : Password should be at least 6 characters`; only the
    /// leading token matters.
    pub fn from_provider_message(message: &str) -> Self {
        let token = message.split(':').next().unwrap_or_default().trim();
        match token {
            "EMAIL_NOT_FOUND" => Self::EmailNotFound,
            "INVALID_PASSWORD" => Self::InvalidPassword,
            "INVALID_LOGIN_CREDENTIALS" => Self::InvalidCredentials,
            "EMAIL_EXISTS" => Self::EmailExists,
            "WEAK_PASSWORD" => Self::WeakPassword,
            "INVALID_EMAIL" => Self::InvalidEmail,
            "MISSING_PASSWORD" => Self::MissingPassword,
            "USER_DISABLED" => Self::UserDisabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => Self::TooManyAttempts,
            "OPERATION_NOT_ALLOWED" => Self::OperationNotAllowed,
            _ => Self::Unknown,
        }
    }

    /// True when the provider looked at the credentials and refused them,
    /// as opposed to never getting a chance to.
    pub fn is_credential_rejection(self) -> bool {
        matches!(
            self,
            Self::EmailNotFound
                | Self::InvalidPassword
                | Self::InvalidCredentials
                | Self::EmailExists
                | Self::WeakPassword
                | Self::InvalidEmail
                | Self::MissingPassword
                | Self::UserDisabled
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code:?}: {message}")]
pub struct AuthError {
    pub code: AuthErrorCode,
    pub message: String,
}

impl AuthError {
    pub fn new(code: AuthErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn from_provider_message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            code: AuthErrorCode::from_provider_message(&message),
            message,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(AuthErrorCode::Network, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(AuthErrorCode::Storage, message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("email is required")]
    MissingEmail,
    #[error("password is required")]
    MissingPassword,
    #[error("email and password are required")]
    MissingEmailAndPassword,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_and_detailed_provider_messages() {
        assert_eq!(
            AuthErrorCode::from_provider_message("EMAIL_NOT_FOUND"),
            AuthErrorCode::EmailNotFound
        );
        assert_eq!(
            AuthErrorCode::from_provider_message(
                "WEAK_PASSWORD : Password should be at least 6 characters"
            ),
            AuthErrorCode::WeakPassword
        );
        assert_eq!(
            AuthErrorCode::from_provider_message("SOMETHING_NEW"),
            AuthErrorCode::Unknown
        );
    }

    #[test]
    fn transport_failures_are_not_credential_rejections() {
        assert!(AuthErrorCode::InvalidCredentials.is_credential_rejection());
        assert!(!AuthErrorCode::Network.is_credential_rejection());
        assert!(!AuthErrorCode::TooManyAttempts.is_credential_rejection());
    }

    #[test]
    fn error_display_includes_code_and_message() {
        let err = AuthError::from_provider_message("EMAIL_EXISTS");
        assert_eq!(err.to_string(), "EmailExists: EMAIL_EXISTS");
    }
}
