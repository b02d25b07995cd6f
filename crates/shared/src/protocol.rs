//! Wire types for the Identity Toolkit `accounts:*` REST endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordAuthRequest {
    pub email: String,
    pub password: String,
    pub return_secure_token: bool,
}

/// Body returned by both `signInWithPassword` and `signUp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordAuthResponse {
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    /// Token lifetime in seconds, encoded as a decimal string.
    pub expires_in: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderErrorEnvelope {
    pub error: ProviderErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderErrorBody {
    pub code: u16,
    pub message: String,
}
