//! Session view controller: derives the visible screen from the provider's
//! current session and turns form actions into backend commands.

use std::sync::Arc;

use auth_client::AuthProvider;
use crossbeam_channel::Sender;
use shared::{
    domain::{Credentials, ViewState},
    error::ValidationError,
};
use tracing::{debug, info, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{describe_failure, UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

/// Shown in place of the email when the session carries none.
pub const SIGNED_IN_PLACEHOLDER: &str = "Username";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Email,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingRequest {
    SignIn,
    SignUp,
}

/// What the screen shows. Exactly one variant is rendered per frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionView {
    SignedOut,
    SignedIn { display_email: String },
}

impl SessionView {
    pub fn view_state(&self) -> ViewState {
        match self {
            SessionView::SignedOut => ViewState::SignedOut,
            SessionView::SignedIn { .. } => ViewState::SignedIn,
        }
    }
}

/// Offer to create an account after a failed sign-in, holding the
/// credentials that were just rejected.
#[derive(Debug, Clone)]
pub struct AccountCreationPrompt {
    credentials: Credentials,
    reason: String,
}

impl AccountCreationPrompt {
    pub fn email(&self) -> &str {
        &self.credentials.email
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

pub struct SessionController {
    provider: Arc<dyn AuthProvider>,
    cmd_tx: Sender<BackendCommand>,

    pub email_input: String,
    pub password_input: String,

    focus_request: Option<FormField>,
    in_flight: Option<(PendingRequest, Credentials)>,
    prompt: Option<AccountCreationPrompt>,
    validation: Option<ValidationError>,
    status: String,
}

impl SessionController {
    pub fn new(provider: Arc<dyn AuthProvider>, cmd_tx: Sender<BackendCommand>) -> Self {
        Self {
            provider,
            cmd_tx,
            email_input: String::new(),
            password_input: String::new(),
            focus_request: Some(FormField::Email),
            in_flight: None,
            prompt: None,
            validation: None,
            status: "Not signed in".to_string(),
        }
    }

    /// Re-derives the screen from the provider's session.
    ///
    /// While signed in the form inputs are cleared and lose focus, so nothing
    /// typed before the transition survives it.
    pub fn refresh(&mut self) -> SessionView {
        match self.provider.current_session() {
            Some(session) => {
                self.email_input.clear();
                self.password_input.clear();
                self.focus_request = None;
                self.validation = None;
                self.prompt = None;
                SessionView::SignedIn {
                    display_email: session
                        .email
                        .unwrap_or_else(|| SIGNED_IN_PLACEHOLDER.to_string()),
                }
            }
            None => SessionView::SignedOut,
        }
    }

    pub fn submit_sign_in(&mut self) {
        if let Some((pending, _)) = &self.in_flight {
            debug!(?pending, "ignoring sign-in submit while a request is in flight");
            return;
        }

        let credentials = match Credentials::from_form(&self.email_input, &self.password_input) {
            Ok(credentials) => credentials,
            Err(err) => {
                warn!("sign-in form incomplete: {err}");
                self.focus_request = Some(match err {
                    ValidationError::MissingPassword => FormField::Password,
                    ValidationError::MissingEmail | ValidationError::MissingEmailAndPassword => {
                        FormField::Email
                    }
                });
                self.validation = Some(err);
                return;
            }
        };

        self.validation = None;
        self.prompt = None;
        info!(email = %credentials.email, "submitting sign-in");
        self.start_request(PendingRequest::SignIn, credentials);
    }

    /// "Continue" on the account-creation prompt: sign up with the same
    /// credentials that just failed to sign in.
    pub fn confirm_account_creation(&mut self) {
        if self.in_flight.is_some() {
            debug!("ignoring account creation while a request is in flight");
            return;
        }
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        info!(email = %prompt.credentials.email, "creating account after failed sign-in");
        self.start_request(PendingRequest::SignUp, prompt.credentials);
    }

    /// "Cancel" on the account-creation prompt.
    pub fn dismiss_account_creation(&mut self) {
        if self.prompt.take().is_some() {
            debug!("account creation declined");
        }
    }

    pub fn submit_sign_out(&mut self) {
        match self.provider.sign_out() {
            Ok(()) => {
                self.status = "Signed out".to_string();
                self.focus_request = Some(FormField::Email);
            }
            Err(err) => {
                warn!(code = ?err.code, "sign-out failed: {err}");
                self.status =
                    describe_failure(&UiError::from_auth(UiErrorContext::SignOut, &err));
            }
        }
        // Whatever the provider now reports is what the screen shows; a failed
        // sign-out leaves the session, and therefore the signed-in view, in place.
        self.refresh();
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::SignedIn => {
                self.in_flight = None;
                self.status = "Signed in".to_string();
                self.refresh();
            }
            UiEvent::AccountCreated => {
                self.in_flight = None;
                self.status = "Account created".to_string();
                self.refresh();
            }
            UiEvent::Error(err) => self.handle_error(err),
        }
    }

    fn handle_error(&mut self, err: UiError) {
        let description = describe_failure(&err);
        let finished = self.in_flight.take();

        match (err.context(), finished) {
            (UiErrorContext::SignIn, Some((PendingRequest::SignIn, credentials))) => {
                warn!(
                    email = %credentials.email,
                    category = ?err.category(),
                    "sign-in failed; offering account creation"
                );
                self.prompt = Some(AccountCreationPrompt {
                    credentials,
                    reason: err.message().to_string(),
                });
            }
            (UiErrorContext::SignUp, Some((PendingRequest::SignUp, credentials))) => {
                warn!(
                    email = %credentials.email,
                    category = ?err.category(),
                    "account creation failed: {}",
                    err.message()
                );
                self.focus_request = Some(FormField::Email);
            }
            (context, finished) => {
                warn!(
                    ?context,
                    category = ?err.category(),
                    pending = ?finished.as_ref().map(|(kind, _)| *kind),
                    "backend error: {}",
                    err.message()
                );
            }
        }
        self.status = description;
    }

    fn start_request(&mut self, kind: PendingRequest, credentials: Credentials) {
        let cmd = match kind {
            PendingRequest::SignIn => BackendCommand::SignIn {
                credentials: credentials.clone(),
            },
            PendingRequest::SignUp => BackendCommand::SignUp {
                credentials: credentials.clone(),
            },
        };
        if dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status) {
            self.status = match kind {
                PendingRequest::SignIn => "Signing in...".to_string(),
                PendingRequest::SignUp => "Creating account...".to_string(),
            };
            self.in_flight = Some((kind, credentials));
        }
    }

    /// True while a sign-in or sign-up is awaiting its result; the triggering
    /// controls stay disabled until it settles.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn pending_request(&self) -> Option<PendingRequest> {
        self.in_flight.as_ref().map(|(kind, _)| *kind)
    }

    pub fn account_prompt(&self) -> Option<&AccountCreationPrompt> {
        self.prompt.as_ref()
    }

    pub fn validation_message(&self) -> Option<String> {
        self.validation.map(|err| {
            let mut message = err.to_string();
            if let Some(first) = message.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            message.push('.');
            message
        })
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn take_focus_request(&mut self) -> Option<FormField> {
        self.focus_request.take()
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
