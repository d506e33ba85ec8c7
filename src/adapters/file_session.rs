//! File-based session key storage.
//!
//! Stores the captured browser session key in `~/.claw/.session.json`. The
//! file is the single secret this program persists; on Unix it is written
//! with owner-only permissions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::traits::{SessionStore, SessionStoreError};

/// The storage directory name under the home directory.
const SESSION_DIR: &str = ".claw";

/// The session file name.
const SESSION_FILE: &str = ".session.json";

/// On-disk shape of the session file.
#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    session_key: String,
    /// Unix timestamp of the last write, for support diagnostics only.
    #[serde(default)]
    saved_at: Option<i64>,
}

/// File-based [`SessionStore`].
///
/// # Example
///
/// ```ignore
/// use claw::adapters::FileSessionStore;
/// use claw::traits::SessionStore;
///
/// let store = FileSessionStore::new()?;
/// store.set("sk-ant-sid01-...").await?;
/// assert!(store.get().await?.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store rooted at `~/.claw/.session.json`.
    pub fn new() -> Result<Self, SessionStoreError> {
        let home = dirs::home_dir().ok_or_else(|| {
            SessionStoreError::Read("unable to determine home directory".to_string())
        })?;
        Ok(Self {
            path: home.join(SESSION_DIR).join(SESSION_FILE),
        })
    }

    /// Create a store over an explicit file path.
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the backing file.
    pub fn session_path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, record: &SessionFile) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut permissions = file.metadata()?.permissions();
            permissions.set_mode(0o600);
            file.set_permissions(permissions)?;
        }
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, record)
            .map_err(|err| std::io::Error::new(ErrorKind::Other, err))?;
        writer.flush()
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self) -> Result<Option<String>, SessionStoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(SessionStoreError::Read(err.to_string())),
        };
        let record: SessionFile = serde_json::from_reader(BufReader::new(file))
            .map_err(|err| SessionStoreError::Read(err.to_string()))?;

        let key = record.session_key.trim().to_string();
        if key.is_empty() {
            Ok(None)
        } else {
            Ok(Some(key))
        }
    }

    async fn set(&self, token: &str) -> Result<(), SessionStoreError> {
        let record = SessionFile {
            session_key: token.trim().to_string(),
            saved_at: Some(chrono::Utc::now().timestamp()),
        };
        tracing::debug!(path = %self.path.display(), "writing session key");
        self.write_file(&record)
            .map_err(|err| SessionStoreError::Write(err.to_string()))
    }

    async fn delete(&self) -> Result<(), SessionStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(SessionStoreError::Delete(err.to_string())),
        }
    }
}
