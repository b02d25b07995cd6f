//! On-disk persistence of the current session, so a relaunch starts signed in.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use shared::domain::Session;

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `Ok(None)` when nothing has been persisted yet.
    pub fn load(&self) -> anyhow::Result<Option<Session>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read session file '{}'", self.path.display())
                })
            }
        };

        let session = serde_json::from_str::<Session>(&raw).with_context(|| {
            format!("session file '{}' is not valid JSON", self.path.display())
        })?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "failed to create session directory '{}'",
                        parent.display()
                    )
                })?;
            }
        }

        let serialized = serde_json::to_vec_pretty(session).context("failed to encode session")?;
        let tmp_path = self.path.with_extension("json.tmp");
        let result = write_private(&tmp_path, &serialized).and_then(|()| {
            fs::rename(&tmp_path, &self.path).with_context(|| {
                format!(
                    "failed to move session file into place at '{}'",
                    self.path.display()
                )
            })
        });
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result
    }

    /// Removing a session that was never saved is not an error.
    pub fn clear(&self) -> anyhow::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| {
                format!("failed to remove session file '{}'", self.path.display())
            }),
        }
    }
}

/// Writes `bytes` to a fresh file readable only by the owner (0600 on unix).
fn write_private(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    // A stale file would keep its old mode; `mode` only applies on create.
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to remove stale '{}'", path.display()))
        }
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(path)
        .with_context(|| format!("failed to create '{}'", path.display()))?;
    file.write_all(bytes)
        .and_then(|()| file.sync_all())
        .with_context(|| format!("failed to write '{}'", path.display()))
}
