//! Persistence of the access/refresh token pair.

use std::fs::{self, OpenOptions};
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::AppError;

/// Authenticated identity: the token pair issued at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
}

impl Session {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

/// Session record stored at `<config dir>/tokens.json`.
///
/// Only one session exists per configuration directory. There is no file
/// locking, the last writer wins.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Creates a store for the given record path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the record.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted session. A missing or unreadable record is `None`.
    pub fn load(&self) -> Option<Session> {
        let content = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<Session>(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "ignoring corrupt session record");
                None
            }
        }
    }

    /// Writes the record with owner-only permissions, replacing any previous one.
    pub fn save(&self, access_token: &str, refresh_token: &str) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Config(format!("Could not create config directory: {}", e))
            })?;
        }

        let content = serde_json::to_string(&Session::new(access_token, refresh_token))
            .map_err(|e| AppError::Config(format!("Could not serialize tokens: {}", e)))?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options
            .open(&self.path)
            .map_err(|e| AppError::Config(format!("Could not save tokens: {}", e)))?;
        file.write_all(content.as_bytes())
            .map_err(|e| AppError::Config(format!("Could not save tokens: {}", e)))?;

        // mode() only applies when the file is created
        #[cfg(unix)]
        fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
            .map_err(|e| AppError::Config(format!("Could not restrict token permissions: {}", e)))?;

        Ok(())
    }

    /// Removes the record. Missing record is not an error.
    pub fn clear(&self) -> Result<(), AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Config(format!("Could not remove tokens: {}", e))),
        }
    }
}
