//! Authentication lifecycle: restore, login, signup, logout, invalidate.
//!
//! The store owns the transitions of the shared [`SessionContext`]. A user is
//! only installed after the remote service has vouched for the token, so
//! `current_user()` is present iff a validated token is present.

use crate::api::{AuthPayload, BoardApi};
use featureflow_core::validation::{
    validate_credentials, validate_password, validate_password_confirmation,
};
use featureflow_core::{
    AuthState, AuthToken, FeedbackError, Result, Session, SessionContext, TokenStore, User,
};
use std::sync::Arc;
use tokio::sync::watch;

/// Input for [`SessionStore::signup`].
#[derive(Debug, Clone, Default)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    /// Checked locally when provided.
    pub password_confirmation: Option<String>,
    pub name: String,
}

impl SignupRequest {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            password_confirmation: None,
            name: name.into(),
        }
    }

    pub fn with_confirmation(mut self, confirmation: impl Into<String>) -> Self {
        self.password_confirmation = Some(confirmation.into());
        self
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() {
            return Err(FeedbackError::validation(
                "signup",
                "Please fill in all fields",
            ));
        }
        if let Some(confirmation) = &self.password_confirmation {
            validate_password_confirmation(&self.password, confirmation)?;
        }
        validate_password(&self.password)
    }
}

pub struct SessionStore {
    api: Arc<BoardApi>,
    context: Arc<SessionContext>,
    tokens: Arc<dyn TokenStore>,
}

impl SessionStore {
    /// Creates a store driving the session context the `api` reads from.
    pub fn new(api: Arc<BoardApi>, tokens: Arc<dyn TokenStore>) -> Self {
        let context = Arc::clone(api.session());
        Self {
            api,
            context,
            tokens,
        }
    }

    pub fn api(&self) -> &Arc<BoardApi> {
        &self.api
    }

    pub fn context(&self) -> &Arc<SessionContext> {
        &self.context
    }

    /// Validates a persisted token, if any, and settles into a terminal state.
    ///
    /// Never fails: an unreadable, rejected or unverifiable token is cleared
    /// and the session stays unauthenticated.
    pub async fn restore(&self) -> AuthState {
        if self.context.snapshot().is_authenticated() {
            return self.context.auth_state();
        }

        let token = match self.tokens.load() {
            Ok(Some(token)) if !token.is_blank() => token,
            Ok(Some(_)) => {
                self.discard_persisted();
                return AuthState::Unauthenticated;
            }
            Ok(None) => return AuthState::Unauthenticated,
            Err(err) => {
                tracing::warn!(error = %err, "Could not read persisted session token");
                self.discard_persisted();
                return AuthState::Unauthenticated;
            }
        };

        match self.api.current_user(&token).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Session restored");
                self.context.establish(token, user.clone());
                AuthState::Authenticated(user)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Persisted token could not be validated");
                self.discard_persisted();
                self.context.clear();
                AuthState::Unauthenticated
            }
        }
    }

    /// Exchanges credentials for a session.
    ///
    /// On failure the session is left as it was and the remote reason is
    /// returned unchanged, so rejected credentials and transport failures
    /// stay distinguishable.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        validate_credentials(email, password)?;

        let payload = self
            .api
            .sign_in(email.trim(), password)
            .await
            .inspect_err(|err| tracing::debug!(error = %err, "Sign-in rejected"))?;

        Ok(self.install(payload))
    }

    /// Registers an account and signs it in.
    pub async fn signup(&self, request: SignupRequest) -> Result<User> {
        request.validate()?;

        let payload = self
            .api
            .sign_up(request.email.trim(), &request.password, request.name.trim())
            .await
            .inspect_err(|err| tracing::debug!(error = %err, "Sign-up rejected"))?;

        Ok(self.install(payload))
    }

    /// Clears persisted and in-memory credentials.
    ///
    /// Idempotent. Returns `true` if a session was active.
    pub fn logout(&self) -> bool {
        self.discard_persisted();
        let was_authenticated = self.context.clear();
        if was_authenticated {
            tracing::info!("Signed out");
        }
        was_authenticated
    }

    /// Drops a session whose token the remote service no longer accepts.
    pub fn invalidate(&self) -> bool {
        self.discard_persisted();
        let was_authenticated = self.context.clear();
        if was_authenticated {
            tracing::warn!("Session token rejected; signed out");
        }
        was_authenticated
    }

    /// Drops the session only if `token` is still the one in use.
    ///
    /// A rejection of a token that was since replaced by a newer sign-in
    /// leaves the newer session and its persisted token untouched.
    pub fn invalidate_if_current(&self, token: &AuthToken) -> bool {
        if !self.context.clear_if_token(token) {
            return false;
        }
        self.discard_persisted();
        tracing::warn!("Session token rejected; signed out");
        true
    }

    pub fn current_user(&self) -> Option<User> {
        self.context.current_user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.context.snapshot().is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.context.snapshot().is_admin()
    }

    pub fn auth_state(&self) -> AuthState {
        self.context.auth_state()
    }

    /// Receiver woken on every authenticated/unauthenticated transition.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.context.subscribe()
    }

    fn install(&self, payload: AuthPayload) -> User {
        let AuthPayload { user, token } = payload;
        if let Err(err) = self.tokens.save(&token) {
            tracing::warn!(error = %err, "Could not persist session token");
        }
        tracing::info!(user_id = %user.id, admin = user.is_admin(), "Signed in");
        self.context.establish(token, user.clone());
        user
    }

    fn discard_persisted(&self) {
        if let Err(err) = self.tokens.clear() {
            tracing::warn!(error = %err, "Could not clear persisted session token");
        }
    }
}
