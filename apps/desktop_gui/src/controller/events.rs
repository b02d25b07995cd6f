//! Backend-to-UI events and error modeling for the desktop sign-in controller.

use shared::error::{AuthError, AuthErrorCode};

#[derive(Debug)]
pub enum UiEvent {
    SignedIn,
    AccountCreated,
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    Storage,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    SignIn,
    SignUp,
    SignOut,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Unknown,
            context,
            message: message.into(),
        }
    }

    pub fn from_auth(context: UiErrorContext, err: &AuthError) -> Self {
        let category = match err.code {
            AuthErrorCode::Network => UiErrorCategory::Transport,
            AuthErrorCode::Storage => UiErrorCategory::Storage,
            AuthErrorCode::InvalidEmail
            | AuthErrorCode::MissingPassword
            | AuthErrorCode::WeakPassword => UiErrorCategory::Validation,
            AuthErrorCode::EmailNotFound
            | AuthErrorCode::InvalidPassword
            | AuthErrorCode::InvalidCredentials
            | AuthErrorCode::EmailExists
            | AuthErrorCode::UserDisabled
            | AuthErrorCode::TooManyAttempts
            | AuthErrorCode::OperationNotAllowed => UiErrorCategory::Auth,
            AuthErrorCode::Unknown => UiErrorCategory::Unknown,
        };

        Self {
            category,
            context,
            message: err.message.clone(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// One-line status text for a failed operation.
pub fn describe_failure(err: &UiError) -> String {
    let action = match err.context {
        UiErrorContext::BackendStartup => "Backend worker startup failed",
        UiErrorContext::SignIn => "Sign in failed",
        UiErrorContext::SignUp => "Account creation failed",
        UiErrorContext::SignOut => "Sign out failed",
    };
    match err.category {
        UiErrorCategory::Transport => {
            format!("{action}: identity provider unreachable; check network and retry.")
        }
        UiErrorCategory::Storage => {
            format!("{action}: could not update the saved session ({}).", err.message)
        }
        UiErrorCategory::Auth | UiErrorCategory::Validation | UiErrorCategory::Unknown => {
            format!("{action}: {}", err.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_failures_are_transport_errors() {
        let err = UiError::from_auth(
            UiErrorContext::SignIn,
            &AuthError::network("connection refused"),
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(
            describe_failure(&err),
            "Sign in failed: identity provider unreachable; check network and retry."
        );
    }

    #[test]
    fn weak_password_is_a_validation_error() {
        let err = UiError::from_auth(
            UiErrorContext::SignUp,
            &AuthError::from_provider_message("WEAK_PASSWORD : too short"),
        );
        assert_eq!(err.category(), UiErrorCategory::Validation);
        assert_eq!(err.context(), UiErrorContext::SignUp);
        assert_eq!(
            describe_failure(&err),
            "Account creation failed: WEAK_PASSWORD : too short"
        );
    }

    #[test]
    fn rejected_credentials_are_auth_errors() {
        let err = UiError::from_auth(
            UiErrorContext::SignIn,
            &AuthError::from_provider_message("INVALID_LOGIN_CREDENTIALS"),
        );
        assert_eq!(err.category(), UiErrorCategory::Auth);
        assert_eq!(err.message(), "INVALID_LOGIN_CREDENTIALS");
    }

    #[test]
    fn storage_failures_mention_saved_session() {
        let err = UiError::from_auth(
            UiErrorContext::SignOut,
            &AuthError::storage("permission denied"),
        );
        assert_eq!(err.category(), UiErrorCategory::Storage);
        assert!(describe_failure(&err).starts_with("Sign out failed: could not update"));
    }
}
