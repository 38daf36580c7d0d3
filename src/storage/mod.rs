//! Durable client-side storage for the GitHub token.
//!
//! The token is the only state that survives a restart. It is written by a
//! successful validation and read once at start-up.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

use crate::constants;

/// Errors from the token store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("no config directory available to store the token in")]
    NoLocation,

    #[error("failed to write token file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A single durable key holding the GitHub token.
pub trait TokenStore: Send + Sync {
    /// The stored token, if one exists and is non-empty.
    fn load(&self) -> Option<String>;

    fn save(&self, token: &str) -> Result<(), StorageError>;
}

/// Token stored in `~/.config/coderefine/github_token`.
pub struct FileTokenStore {
    path: Option<PathBuf>,
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTokenStore {
    /// Use the default location under the user config directory.
    pub fn new() -> Self {
        let path = dirs::config_dir()
            .map(|d| d.join(constants::CONFIG_DIR).join(constants::TOKEN_FILENAME));
        Self { path }
    }

    /// Use an explicit file (useful for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let path = self.path.as_ref()?;
        let content = std::fs::read_to_string(path).ok()?;
        let token = content.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        let path = self.path.as_ref().ok_or(StorageError::NoLocation)?;
        let write_err = |source| StorageError::Write {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(path).map_err(write_err)?;

        // `mode` only applies on creation; tighten a file left by an older run.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .map_err(write_err)?;
        }
        file.write_all(token.as_bytes()).map_err(write_err)?;

        tracing::debug!(path = %path.display(), "saved GitHub token");
        Ok(())
    }
}

/// Process-local store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `token`.
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .filter(|t| !t.trim().is_empty())
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }
}
