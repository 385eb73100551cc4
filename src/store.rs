//! Session store: persistent home of the current [`Session`].
//!
//! DESIGN
//! ======
//! One key, one value: the whole bundle (credentials and role) is written as
//! a single JSON document and replaced wholesale on re-login. Anything that
//! does not parse back into a complete bundle reads as "not logged in".

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::ApiError;
use crate::session::Session;

/// Storage key holding the serialized bundle.
pub const SESSION_KEY: &str = "session";

/// Read/write/clear access to the stored session.
///
/// Implementations are injected into the fetcher and flows rather than
/// reached through globals, so tests can swap in [`MemorySessionStore`].
pub trait SessionStore: Send + Sync {
    /// Snapshot of the stored session, or `None` when empty or unusable.
    fn read(&self) -> Option<Session>;

    /// Replace any stored session with `session`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing storage cannot be written.
    fn write(&self, session: &Session) -> Result<(), ApiError>;

    /// Remove the stored session. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the backing storage cannot be removed.
    fn clear(&self) -> Result<(), ApiError>;
}

fn decode(raw: &str, source: &str) -> Option<Session> {
    let session = match serde_json::from_str::<Session>(raw) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(%source, error = %e, "stored session is malformed; treating as logged out");
            return None;
        }
    };
    match session.validate() {
        Ok(session) => Some(session),
        Err(field) => {
            tracing::warn!(%source, %field, "stored session is incomplete; treating as logged out");
            None
        }
    }
}

fn encode(session: &Session) -> Result<String, ApiError> {
    serde_json::to_string(session).map_err(|e| ApiError::Storage(e.to_string()))
}

// =============================================================================
// MEMORY
// =============================================================================

/// In-process store holding the serialized bundle.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    raw: Mutex<Option<String>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with raw stored content, as if written by someone else.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self { raw: Mutex::new(Some(raw.into())) }
    }

    /// Raw stored content, if any.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.raw.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn read(&self) -> Option<Session> {
        let raw = self.raw.lock().unwrap_or_else(PoisonError::into_inner).clone()?;
        decode(&raw, SESSION_KEY)
    }

    fn write(&self, session: &Session) -> Result<(), ApiError> {
        let encoded = encode(session)?;
        *self.raw.lock().unwrap_or_else(PoisonError::into_inner) = Some(encoded);
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        self.raw.lock().unwrap_or_else(PoisonError::into_inner).take();
        Ok(())
    }
}

// =============================================================================
// FILE
// =============================================================================

/// Store backed by one JSON file.
///
/// Writes go to a sibling temp file that is then renamed over the target, so
/// a reader never sees a half-written bundle.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(ToOwned::to_owned).unwrap_or_else(|| SESSION_KEY.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStore for FileSessionStore {
    fn read(&self) -> Option<Session> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session file unreadable");
                return None;
            }
        };
        decode(&raw, &self.path.display().to_string())
    }

    fn write(&self, session: &Session) -> Result<(), ApiError> {
        let encoded = encode(session)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ApiError::Storage(e.to_string()))?;
        }
        let temp = self.temp_path();
        std::fs::write(&temp, encoded).map_err(|e| ApiError::Storage(e.to_string()))?;
        std::fs::rename(&temp, &self.path).map_err(|e| ApiError::Storage(e.to_string()))
    }

    fn clear(&self) -> Result<(), ApiError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::Storage(e.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
