//! Persistence of the session token across restarts.

use crate::error::{FeedbackError, Result};
use crate::session::AuthToken;
use std::sync::Mutex;

/// Storage for the bearer token that survives process restarts.
///
/// Operations are synchronous so that logout can clear persisted state
/// before returning.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<AuthToken>>;

    fn save(&self, token: &AuthToken) -> Result<()>;

    /// Removes the persisted token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;
}

/// Process-local token store, used when no persistence is wanted.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<AuthToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: AuthToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<AuthToken>> {
        let guard = self
            .token
            .lock()
            .map_err(|e| FeedbackError::storage(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, token: &AuthToken) -> Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|e| FeedbackError::storage(e.to_string()))?;
        *guard = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|e| FeedbackError::storage(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}
