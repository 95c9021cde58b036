//! File-backed token persistence.
//!
//! The token is written to `session.json` with tmp file + atomic rename so a
//! crash mid-write never leaves a truncated credential behind.

use crate::paths::FeatureflowPaths;
use featureflow_core::{AuthToken, FeedbackError, Result, TokenStore};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{self, Write as IoWrite};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: AuthToken,
}

/// [`TokenStore`] persisting to a JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store at the default location (`<config dir>/session.json`).
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(FeatureflowPaths::token_file()?))
    }

    /// Creates a store with a custom path (for testing or config override).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| FeedbackError::storage("Token path has no file name"))?;
        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(".tmp");
        Ok(self.path.with_file_name(tmp_name))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<AuthToken>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let stored: StoredSession = serde_json::from_str(&content)?;
        if stored.token.is_blank() {
            return Ok(None);
        }
        Ok(Some(stored.token))
    }

    fn save(&self, token: &AuthToken) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&StoredSession {
            token: token.clone(),
        })?;

        let tmp_path = self.temp_path()?;
        let written = write_private(&tmp_path, json.as_bytes())
            .and_then(|()| fs::rename(&tmp_path, &self.path));
        if let Err(err) = written {
            if let Err(cleanup) = fs::remove_file(&tmp_path)
                && cleanup.kind() != io::ErrorKind::NotFound
            {
                tracing::warn!(
                    path = %tmp_path.display(),
                    error = %cleanup,
                    "Could not remove temporary token file"
                );
            }
            return Err(err.into());
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Writes `bytes` to a file that is user read/write only on Unix from the
/// moment it exists.
fn write_private(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;

    // `mode` only applies on creation; a leftover file keeps its bits.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(bytes)?;
    file.sync_all()
}
