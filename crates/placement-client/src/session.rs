//! Persisted login session.
//!
//! `placement login` exchanges credentials for a token pair and stores it
//! in a small JSON file; later commands read the access token back from it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::config_dir;

/// Token pair returned by `POST /api/token/`.
///
/// Note: Custom Debug impl masks both tokens.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access", &"***")
            .field("refresh", &self.refresh.as_ref().map(|_| "***"))
            .finish()
    }
}

/// What is written to the session file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// API the tokens were issued by.
    pub base_url: String,
    pub username: String,
    pub credentials: Credentials,
}

/// Reads and writes the session file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `PLACEMENT_SESSION_FILE`, else `~/.config/placement/session.json`,
    /// else `.placement-session.json` in the current directory.
    pub fn default_location() -> Self {
        let path = std::env::var("PLACEMENT_SESSION_FILE")
            .map(PathBuf::from)
            .ok()
            .or_else(|| config_dir().map(|dir| dir.join("session.json")))
            .unwrap_or_else(|| PathBuf::from(".placement-session.json"));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored session, or `None` when nobody is logged in.
    pub fn load(&self) -> Result<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read session: {}", self.path.display()))?;
        let session = serde_json::from_str(&content)
            .with_context(|| format!("corrupt session file: {}", self.path.display()))?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &StoredSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session).context("failed to serialize session")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write session: {}", self.path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    /// Remove the session file. Returns whether one existed.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&self.path)
            .with_context(|| format!("failed to remove session: {}", self.path.display()))?;
        Ok(true)
    }

    /// Tokens for `base_url`.
    ///
    /// `PLACEMENT_TOKEN` wins over the file and comes without a refresh
    /// token. A stored session issued by a different API is ignored.
    pub fn credentials(&self, base_url: &str) -> Result<Option<Credentials>> {
        if let Ok(token) = std::env::var("PLACEMENT_TOKEN") {
            if !token.is_empty() {
                return Ok(Some(Credentials {
                    access: token,
                    refresh: None,
                }));
            }
        }
        let Some(session) = self.load()? else {
            return Ok(None);
        };
        if !same_api(&session.base_url, base_url) {
            tracing::debug!(
                stored = %session.base_url,
                wanted = %base_url,
                "stored session belongs to another API"
            );
            return Ok(None);
        }
        Ok(Some(session.credentials))
    }

    /// Replace the stored tokens after a refresh. A missing session, or one
    /// for another API, is left alone.
    pub fn renew(&self, base_url: &str, credentials: &Credentials) -> Result<()> {
        let Some(mut session) = self.load()? else {
            return Ok(());
        };
        if !same_api(&session.base_url, base_url) {
            return Ok(());
        }
        session.credentials = credentials.clone();
        self.save(&session)
    }
}

fn same_api(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}
