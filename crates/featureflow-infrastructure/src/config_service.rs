//! Configuration service implementation.
//!
//! Loads [`ClientConfig`] from `config.toml`, falling back to defaults when
//! the file is absent, and applies environment overrides.

use crate::paths::FeatureflowPaths;
use featureflow_core::config::ClientConfig;
use featureflow_core::{FeedbackError, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Configuration service that loads and caches the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the default config file.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(FeatureflowPaths::config_file()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<ClientConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|e| FeedbackError::internal(e.to_string()))?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self
            .load_file()?
            .apply_env(|key| std::env::var(key).ok());

        tracing::debug!(path = %self.path.display(), api_url = %loaded.api_url, "Loaded client config");

        let mut write_lock = self
            .config
            .write()
            .map_err(|e| FeedbackError::internal(e.to_string()))?;
        *write_lock = Some(loaded.clone());

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    fn load_file(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            return Ok(ClientConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(ClientConfig::default());
        }

        toml::from_str(&content).map_err(|e| {
            FeedbackError::config(format!("{}: {}", self.path.display(), e))
        })
    }
}
