use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "signin.toml";
pub const DEFAULT_AUTH_BASE_URL: &str = "https://identitytoolkit.googleapis.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    pub api_key: String,
    pub auth_base_url: String,
    pub session_path: PathBuf,
    pub request_timeout_secs: u64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            auth_base_url: DEFAULT_AUTH_BASE_URL.into(),
            session_path: default_session_path(),
            request_timeout_secs: 30,
        }
    }
}

/// Values given on a command line; applied after the file and environment.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub api_key: Option<String>,
    pub auth_base_url: Option<String>,
    pub session_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_key: Option<String>,
    auth_base_url: Option<String>,
    session_path: Option<PathBuf>,
    request_timeout_seconds: Option<u64>,
}

impl AuthSettings {
    pub fn apply_file_overrides(&mut self, raw: &str) -> anyhow::Result<()> {
        let file_cfg: FileSettings = toml::from_str(raw).context("invalid settings file")?;
        if let Some(v) = file_cfg.api_key {
            self.api_key = v;
        }
        if let Some(v) = file_cfg.auth_base_url {
            self.auth_base_url = v;
        }
        if let Some(v) = file_cfg.session_path {
            self.session_path = v;
        }
        if let Some(v) = file_cfg.request_timeout_seconds {
            self.request_timeout_secs = v;
        }
        Ok(())
    }

    /// Later names win, so `APP__API_KEY` beats `SIGNIN_API_KEY`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("SIGNIN_API_KEY") {
            self.api_key = v;
        }
        if let Some(v) = lookup("APP__API_KEY") {
            self.api_key = v;
        }
        if let Some(v) = lookup("APP__AUTH_BASE_URL") {
            self.auth_base_url = v;
        }
        if let Some(v) = lookup("APP__SESSION_PATH") {
            self.session_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECONDS") {
            match v.parse::<u64>() {
                Ok(parsed) => self.request_timeout_secs = parsed,
                Err(_) => tracing::warn!(value = %v, "ignoring unparseable APP__REQUEST_TIMEOUT_SECONDS"),
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: SettingsOverrides) {
        if let Some(v) = overrides.api_key {
            self.api_key = v;
        }
        if let Some(v) = overrides.auth_base_url {
            self.auth_base_url = v;
        }
        if let Some(v) = overrides.session_path {
            self.session_path = v;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_key.trim().is_empty() {
            bail!("identity provider api key is missing; set api_key in {DEFAULT_CONFIG_FILE} or SIGNIN_API_KEY");
        }
        let base = Url::parse(&self.auth_base_url)
            .with_context(|| format!("invalid auth base url '{}'", self.auth_base_url))?;
        if !matches!(base.scheme(), "http" | "https") {
            bail!("auth base url must be http(s), got '{}'", base.scheme());
        }
        if self.request_timeout_secs == 0 {
            bail!("request timeout must be at least one second");
        }
        Ok(())
    }
}

/// Defaults, then the settings file, then environment variables.
///
/// An explicitly requested file must exist; the default `signin.toml` is
/// optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<AuthSettings> {
    let mut settings = AuthSettings::default();

    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    match fs::read_to_string(&path) {
        Ok(raw) => settings
            .apply_file_overrides(&raw)
            .with_context(|| format!("failed to load '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
            tracing::debug!(path = %path.display(), "no settings file; using defaults");
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()));
        }
    }

    settings.apply_env_overrides(|name| std::env::var(name).ok());
    Ok(settings)
}

fn default_session_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|base| base.join("email_signin"))
        .unwrap_or_else(|| PathBuf::from(".email_signin"))
        .join("session.json")
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
