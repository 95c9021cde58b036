//! Unified path management for featureflow files.
//!
//! ```text
//! ~/.config/featureflow/       # Config directory (platform dependent)
//! ├── config.toml              # Client configuration
//! └── session.json             # Persisted bearer token
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "featureflow";
const CONFIG_FILE_NAME: &str = "config.toml";
const TOKEN_FILE_NAME: &str = "session.json";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for featureflow_core::FeedbackError {
    fn from(err: PathError) -> Self {
        featureflow_core::FeedbackError::config(err.to_string())
    }
}

pub struct FeatureflowPaths;

impl FeatureflowPaths {
    /// Returns the featureflow configuration directory.
    ///
    /// - Linux: `~/.config/featureflow/`
    /// - macOS: `~/Library/Application Support/featureflow/`
    /// - Windows: `%APPDATA%\featureflow\`
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Default location of the persisted session token.
    pub fn token_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(TOKEN_FILE_NAME))
    }

    /// Token location for a config file kept outside the default directory.
    pub fn token_file_beside(config_file: &Path) -> PathBuf {
        config_file.with_file_name(TOKEN_FILE_NAME)
    }
}
