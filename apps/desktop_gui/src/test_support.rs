use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use auth_client::AuthProvider;
use shared::{
    domain::{Credentials, Session, UserId},
    error::AuthError,
};

pub fn session_for(email: Option<&str>) -> Session {
    Session {
        user_id: UserId(format!("uid-{}", email.unwrap_or("anonymous"))),
        email: email.map(str::to_string),
        id_token: "id-token".into(),
        refresh_token: "refresh-token".into(),
        expires_at: "2030-01-01T00:00:00Z".parse().expect("timestamp"),
    }
}

/// In-memory provider: accounts are email/password pairs, and every call is
/// recorded for assertions.
#[derive(Default)]
pub struct FakeAuthProvider {
    session: Mutex<Option<Session>>,
    accounts: Mutex<HashMap<String, String>>,
    sign_in_calls: Mutex<Vec<Credentials>>,
    sign_up_calls: Mutex<Vec<Credentials>>,
    sign_out_calls: AtomicUsize,
    fail_sign_out: AtomicBool,
    fail_sign_up: Mutex<Option<AuthError>>,
}

impl FakeAuthProvider {
    pub fn signed_in(email: Option<&str>) -> Self {
        let provider = Self::default();
        *provider.session.lock().expect("session") = Some(session_for(email));
        provider
    }

    pub fn with_account(email: &str, password: &str) -> Self {
        let provider = Self::default();
        provider
            .accounts
            .lock()
            .expect("accounts")
            .insert(email.to_string(), password.to_string());
        provider
    }

    pub fn fail_sign_out(&self, fail: bool) {
        self.fail_sign_out.store(fail, Ordering::SeqCst);
    }

    pub fn fail_sign_up_with(&self, err: AuthError) {
        *self.fail_sign_up.lock().expect("fail_sign_up") = Some(err);
    }

    pub fn set_session(&self, session: Option<Session>) {
        *self.session.lock().expect("session") = session;
    }

    pub fn sign_in_calls(&self) -> Vec<Credentials> {
        self.sign_in_calls.lock().expect("calls").clone()
    }

    pub fn sign_up_calls(&self) -> Vec<Credentials> {
        self.sign_up_calls.lock().expect("calls").clone()
    }

    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthProvider for FakeAuthProvider {
    fn current_session(&self) -> Option<Session> {
        self.session.lock().expect("session").clone()
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        self.sign_in_calls
            .lock()
            .expect("calls")
            .push(credentials.clone());
        let known = self
            .accounts
            .lock()
            .expect("accounts")
            .get(&credentials.email)
            .cloned();
        match known {
            Some(password) if password == credentials.password => {
                let session = session_for(Some(&credentials.email));
                self.set_session(Some(session.clone()));
                Ok(session)
            }
            _ => Err(AuthError::from_provider_message("INVALID_LOGIN_CREDENTIALS")),
        }
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        self.sign_up_calls
            .lock()
            .expect("calls")
            .push(credentials.clone());
        if let Some(err) = self.fail_sign_up.lock().expect("fail_sign_up").clone() {
            return Err(err);
        }
        let mut accounts = self.accounts.lock().expect("accounts");
        if accounts.contains_key(&credentials.email) {
            return Err(AuthError::from_provider_message("EMAIL_EXISTS"));
        }
        accounts.insert(credentials.email.clone(), credentials.password.clone());
        drop(accounts);

        let session = session_for(Some(&credentials.email));
        self.set_session(Some(session.clone()));
        Ok(session)
    }

    fn sign_out(&self) -> Result<(), AuthError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(AuthError::storage("session file is read-only"));
        }
        self.set_session(None);
        Ok(())
    }
}
