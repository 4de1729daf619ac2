//! Where the acting user's identity lives between runs.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use solvr_config::SessionConfig;
use solvr_core::identity::SessionIdentity;

use crate::error::AuthError;

/// Persistence for the current [`SessionIdentity`].
pub trait IdentityStore: Send + Sync {
    /// The stored identity, or `None` when nobody is logged in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::IdentityStore`] if the backing storage exists but
    /// cannot be read.
    fn load(&self) -> Result<Option<SessionIdentity>, AuthError>;

    /// # Errors
    ///
    /// Returns [`AuthError::IdentityStore`] if the identity cannot be written.
    fn save(&self, identity: &SessionIdentity) -> Result<(), AuthError>;

    /// Forget the stored identity. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::IdentityStore`] if the stored identity cannot be removed.
    fn clear(&self) -> Result<(), AuthError>;
}

/// TOML file store. The parent directory is `0700` and the file `0600` on unix.
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// # Errors
    ///
    /// Returns [`AuthError::IdentityStore`] when no path is configured and
    /// the platform has no config directory.
    pub fn from_config(config: &SessionConfig) -> Result<Self, AuthError> {
        config.identity_path().map(Self::new).ok_or_else(|| {
            AuthError::IdentityStore("config directory not found, set session.identity_path".into())
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentityStore for FileIdentityStore {
    fn load(&self) -> Result<Option<SessionIdentity>, AuthError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AuthError::IdentityStore(format!(
                    "read {}: {e}",
                    self.path.display()
                )));
            }
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        toml::from_str(&content).map(Some).map_err(|e| {
            AuthError::IdentityStore(format!("parse {}: {e}", self.path.display()))
        })
    }

    fn save(&self, identity: &SessionIdentity) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AuthError::IdentityStore(format!("mkdir {}: {e}", parent.display()))
            })?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                    tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
                }
            }
        }

        let content = toml::to_string(identity)
            .map_err(|e| AuthError::IdentityStore(format!("serialize identity: {e}")))?;
        fs::write(&self.path, content)
            .map_err(|e| AuthError::IdentityStore(format!("write {}: {e}", self.path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                AuthError::IdentityStore(format!("chmod {}: {e}", self.path.display()))
            })?;
        }

        tracing::debug!(path = %self.path.display(), "identity saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::IdentityStore(format!(
                "delete {}: {e}",
                self.path.display()
            ))),
        }
    }
}

/// In-process store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    identity: Mutex<Option<SessionIdentity>>,
}

impl MemoryIdentityStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_identity(identity: SessionIdentity) -> Self {
        Self {
            identity: Mutex::new(Some(identity)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<SessionIdentity>> {
        // A poisoned lock still holds a consistent Option.
        self.identity
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn load(&self) -> Result<Option<SessionIdentity>, AuthError> {
        Ok(self.slot().clone())
    }

    fn save(&self, identity: &SessionIdentity) -> Result<(), AuthError> {
        *self.slot() = Some(identity.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use solvr_core::enums::UserRole;

    #[test]
    fn file_store_save_load_clear_cycle() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let store = FileIdentityStore::new(tmp.path().join("solvr").join("session.toml"));

        assert_eq!(store.load().unwrap(), None);

        let identity = SessionIdentity::new("6560f0c2a1", UserRole::Buyer);
        store.save(&identity).unwrap();
        assert_eq!(store.load().unwrap(), Some(identity));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn file_store_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let dir = tmp.path().join("solvr");
        let store = FileIdentityStore::new(dir.join("session.toml"));
        store
            .save(&SessionIdentity::new("u1", UserRole::Solver))
            .unwrap();

        let file_mode = fs::metadata(store.path()).unwrap().permissions().mode() & 0o777;
        let dir_mode = fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
        assert_eq!(file_mode, 0o600, "identity file should be 0600");
        assert_eq!(dir_mode, 0o700, "identity dir should be 0700");
    }

    #[test]
    fn file_store_writes_wire_role() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let store = FileIdentityStore::new(tmp.path().join("session.toml"));
        store
            .save(&SessionIdentity::new("u1", UserRole::Solver))
            .unwrap();
        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("role = \"solver\""), "got: {content}");
    }

    #[test]
    fn whitespace_file_is_logged_out() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let path = tmp.path().join("session.toml");
        fs::write(&path, "  \n").unwrap();
        assert_eq!(FileIdentityStore::new(path).load().unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let path = tmp.path().join("session.toml");
        fs::write(&path, "user_id = ").unwrap();
        assert!(matches!(
            FileIdentityStore::new(path).load(),
            Err(AuthError::IdentityStore(_))
        ));
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryIdentityStore::new();
        let identity = SessionIdentity::new("m", UserRole::Buyer);
        store.save(&identity).unwrap();
        assert_eq!(store.load().unwrap(), Some(identity));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
