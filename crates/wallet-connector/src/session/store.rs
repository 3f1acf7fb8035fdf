/*
[INPUT]:  Connected email and storage location
[OUTPUT]: Session identity persisted across process restarts
[POS]:    Session layer - credential persistence
[UPDATE]: When the stored record format or file location changes
*/

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{read_guard, write_guard};
use crate::error::Result;

/// Process-wide store for the connected email
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, email: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    email: String,
    saved_at: DateTime<Utc>,
}

/// JSON file store, readable only by the owner on unix
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_str::<StoredSession>(&content) {
            Ok(session) if !session.email.trim().is_empty() => Ok(Some(session.email)),
            Ok(_) => Ok(None),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring unreadable session file");
                Ok(None)
            }
        }
    }

    fn save(&self, email: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let record = StoredSession {
            email: email.to_string(),
            saved_at: Utc::now(),
        };
        fs::write(&self.path, serde_json::to_vec_pretty(&record)?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = fs::metadata(&self.path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.path, perms)?;
        }

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    email: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_email(email: &str) -> Self {
        Self {
            email: RwLock::new(Some(email.to_string())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(read_guard(&self.email).clone())
    }

    fn save(&self, email: &str) -> Result<()> {
        *write_guard(&self.email) = Some(email.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *write_guard(&self.email) = None;
        Ok(())
    }
}
