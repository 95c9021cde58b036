//! Client configuration model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding [`ClientConfig::api_url`].
pub const API_URL_ENV: &str = "FEATUREFLOW_API_URL";

/// Root configuration loaded from `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Versioned API base, e.g. `https://feedback.example.com/api/v1`.
    pub api_url: String,
    pub request_timeout_secs: u64,
    /// Overrides the default token location (`<config dir>/session.json`).
    pub token_file: Option<PathBuf>,
    /// When true, any in-flight mutation on an idea blocks every other
    /// mutation on that idea, not only mutations of the same kind.
    pub serialize_entity_mutations: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            token_file: None,
            serialize_entity_mutations: true,
        }
    }
}

impl ClientConfig {
    /// Applies overrides from an environment lookup.
    pub fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        self
    }

    /// API base without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}
