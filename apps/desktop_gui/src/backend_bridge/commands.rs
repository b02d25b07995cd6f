//! Backend commands queued from UI to backend worker.

use shared::domain::Credentials;

#[derive(Debug)]
pub enum BackendCommand {
    SignIn { credentials: Credentials },
    SignUp { credentials: Credentials },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::SignIn { .. } => "sign_in",
            BackendCommand::SignUp { .. } => "sign_up",
        }
    }
}
