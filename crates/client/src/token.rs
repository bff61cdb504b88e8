//! Credential storage.
//!
//! One slot, one credential: `set` atomically replaces whatever was there,
//! `clear` is a no-op when the slot is already empty. No expiry checks
//! happen here; this layer is purely mechanical storage.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Storage for the current bearer credential.
///
/// Implementations must be safe to share across in-flight requests: the
/// pipeline reads on every dispatch, and login/logout/forced-expiry write
/// concurrently.
pub trait TokenStore: Send + Sync + core::fmt::Debug {
    /// The stored credential, if any.
    fn get(&self) -> Option<String>;

    /// Store `token`, replacing any prior credential.
    fn set(&self, token: &str);

    /// Remove the credential. Must be a no-op when none is stored.
    fn clear(&self);
}

/// Process-local store, for tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.slot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn set(&self, token: &str) {
        *self.slot.write().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
    }

    fn clear(&self) {
        *self.slot.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

/// Durable single-key store under the user's data directory.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// new credential replaces the old one atomically even if the process dies
/// mid-write. Storage failures degrade to "no credential" rather than
/// panicking; the backend will answer 401 and the session layer recovers.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store the credential at an explicit path.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the credential under the platform's user data directory
    /// (`<data_dir>/policydesk/credential`).
    pub fn in_user_data_dir() -> io::Result<Self> {
        let base = dirs::data_dir().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "no user data directory available")
        })?;
        let dir = base.join("policydesk");
        std::fs::create_dir_all(&dir)?;
        Ok(Self { path: dir.join("credential") })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "failed to read credential");
                None
            }
        }
    }

    fn set(&self, token: &str) {
        let tmp = self.path.with_extension("tmp");
        let result = std::fs::write(&tmp, token).and_then(|()| std::fs::rename(&tmp, &self.path));
        if let Err(e) = result {
            tracing::error!(path = %self.path.display(), error = %e, "failed to persist credential");
        }
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "failed to clear credential");
            }
        }
    }
}
