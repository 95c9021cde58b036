//! Infrastructure adapters for the Feature Flow client: the HTTP gateway,
//! token persistence and configuration loading.

pub mod config_service;
pub mod http_gateway;
pub mod paths;
pub mod token_storage;

pub use crate::config_service::ConfigService;
pub use crate::http_gateway::HttpGateway;
pub use crate::paths::FeatureflowPaths;
pub use crate::token_storage::FileTokenStore;
