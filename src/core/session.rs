//! Authenticated session passed explicitly to the API client
//!
//! The bearer token lives in `session.yaml` next to the global config, under
//! the `token` key. Nothing reads it implicitly: commands load a [`Session`]
//! and hand it to [`ApiClient`](crate::core::client::ApiClient) at construction.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::config::Config;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Could not determine config directory for the session file")]
    NoConfigDir,

    #[error("Token must not be empty")]
    EmptyToken,

    #[error("Failed to parse session file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Credentials for talking to the shop API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

impl Session {
    /// A session without credentials; requests carry no Authorization header
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Result<Self, SessionError> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        Ok(Self { token: Some(token) })
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// `Authorization` header value, when a token is present
    pub fn authorization(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }
}

/// Persists a [`Session`] to disk
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store located in the shopdesk config directory
    pub fn default_location() -> Result<Self, SessionError> {
        Config::config_dir()
            .map(|dir| Self::new(dir.join("session.yaml")))
            .ok_or(SessionError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored session; a missing file is an anonymous session
    pub fn load(&self) -> Result<Session, SessionError> {
        if !self.path.exists() {
            return Ok(Session::anonymous());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Session::anonymous());
        }
        serde_yml::from_str(&contents).map_err(|e| SessionError::Parse {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yml::to_string(session).map_err(|e| SessionError::Parse {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;

        // An existing file keeps its mode on open
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(yaml.as_bytes())?;

        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Remove the stored session; returns whether one existed
    pub fn clear(&self) -> Result<bool, SessionError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            return Ok(true);
        }
        Ok(false)
    }
}

/// Resolve the session for a command: an explicit token wins over the stored one
pub fn resolve_session(explicit_token: Option<&str>) -> Result<Session, SessionError> {
    if let Some(token) = explicit_token.filter(|t| !t.trim().is_empty()) {
        return Session::with_token(token);
    }
    SessionStore::default_location()?.load()
}
