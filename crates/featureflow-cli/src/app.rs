//! Wires configuration, gateway, token storage and the stores together.

use anyhow::{Context, Result};
use featureflow_application::{BoardApi, EngagementStore, FlightPolicy, SessionStore};
use featureflow_core::SessionContext;
use featureflow_infrastructure::{ConfigService, FeatureflowPaths, FileTokenStore, HttpGateway};
use std::path::PathBuf;
use std::sync::Arc;

pub struct App {
    pub session: Arc<SessionStore>,
    pub store: EngagementStore,
}

impl App {
    pub fn bootstrap(api_url: Option<String>, config_path: Option<PathBuf>) -> Result<Self> {
        let config_service = match &config_path {
            Some(path) => ConfigService::with_path(path.clone()),
            None => ConfigService::new().context("Failed to locate the config directory")?,
        };
        let mut config = config_service
            .get_config()
            .context("Failed to load configuration")?;
        if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
            config.api_url = url;
        }

        let tokens = match (&config.token_file, &config_path) {
            (Some(path), _) => FileTokenStore::with_path(path.clone()),
            (None, Some(config_file)) => {
                FileTokenStore::with_path(FeatureflowPaths::token_file_beside(config_file))
            }
            (None, None) => FileTokenStore::new()?,
        };
        tracing::debug!(api_url = %config.base_url(), token_file = %tokens.path().display(), "Bootstrapping");

        let gateway = HttpGateway::from_config(&config)?;
        let api = Arc::new(BoardApi::new(
            Arc::new(gateway),
            Arc::new(SessionContext::new()),
        ));
        let session = Arc::new(SessionStore::new(api, Arc::new(tokens)));
        let store = EngagementStore::new(
            Arc::clone(&session),
            FlightPolicy::from_serialize_flag(config.serialize_entity_mutations),
        );

        Ok(Self { session, store })
    }
}
