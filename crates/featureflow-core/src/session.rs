//! Authentication session shared by the gateway and the stores.
//!
//! The session is an explicitly injected [`SessionContext`] rather than a
//! global: every component that needs the token or the current user holds an
//! `Arc<SessionContext>` and reads it at call time.

use crate::user::User;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::watch;

/// Opaque bearer credential.
///
/// `Debug` is redacted so the token never reaches log output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Authentication state observed by dependent components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated(User),
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            AuthState::Unauthenticated => None,
        }
    }
}

/// In-memory session.
///
/// Token and user are stored together so one can never be present without
/// the other; a user only exists once its token has been validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    credentials: Option<(AuthToken, User)>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: AuthToken, user: User) -> Self {
        Self {
            credentials: Some((token, user)),
        }
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.credentials.as_ref().map(|(token, _)| token)
    }

    pub fn user(&self) -> Option<&User> {
        self.credentials.as_ref().map(|(_, user)| user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(User::is_admin)
    }

    pub fn auth_state(&self) -> AuthState {
        match self.user() {
            Some(user) => AuthState::Authenticated(user.clone()),
            None => AuthState::Unauthenticated,
        }
    }
}

/// Shared, observable holder of the current [`Session`].
///
/// Backed by a `watch` channel: readers take a snapshot at call time and
/// subscribers are woken on every authenticated/unauthenticated transition.
#[derive(Debug)]
pub struct SessionContext {
    tx: watch::Sender<Session>,
}

impl SessionContext {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::anonymous());
        Self { tx }
    }

    /// Snapshot of the current session.
    pub fn snapshot(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// Bearer token to attach to the next request, if any.
    pub fn token(&self) -> Option<AuthToken> {
        self.tx.borrow().token().cloned()
    }

    pub fn current_user(&self) -> Option<User> {
        self.tx.borrow().user().cloned()
    }

    pub fn auth_state(&self) -> AuthState {
        self.tx.borrow().auth_state()
    }

    /// Installs validated credentials. Returns `true` if observers were notified.
    pub fn establish(&self, token: AuthToken, user: User) -> bool {
        let next = Session::authenticated(token, user);
        self.tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        })
    }

    /// Drops credentials. Returns `true` if the session was authenticated.
    pub fn clear(&self) -> bool {
        self.tx.send_if_modified(|current| {
            if current.is_authenticated() {
                *current = Session::anonymous();
                true
            } else {
                false
            }
        })
    }

    /// Drops credentials only while `token` is still the active one.
    ///
    /// A session established after `token` was sent is left alone.
    pub fn clear_if_token(&self, token: &AuthToken) -> bool {
        self.tx.send_if_modified(|current| {
            if current.token() == Some(token) {
                *current = Session::anonymous();
                true
            } else {
                false
            }
        })
    }

    /// Subscribes to session transitions.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> User {
        User {
            id: "1".to_string(),
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            admin: false,
        }
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AuthToken::new("super-secret");
        assert_eq!(format!("{:?}", token), "AuthToken(***)");
        assert_eq!(token.as_str(), "super-secret");
    }

    #[test]
    fn test_user_present_iff_token_present() {
        let context = SessionContext::new();
        assert!(context.token().is_none());
        assert!(context.current_user().is_none());

        context.establish(AuthToken::new("t"), ada());
        assert!(context.token().is_some());
        assert_eq!(context.current_user(), Some(ada()));

        context.clear();
        assert!(context.token().is_none());
        assert!(context.current_user().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_observe_transitions() {
        let context = SessionContext::new();
        let mut rx = context.subscribe();

        assert!(context.establish(AuthToken::new("t"), ada()));
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_authenticated());

        assert!(context.clear());
        rx.changed().await.unwrap();
        assert!(!rx.borrow_and_update().is_authenticated());
    }

    #[test]
    fn test_clear_when_anonymous_is_silent() {
        let context = SessionContext::new();
        let rx = context.subscribe();

        assert!(!context.clear());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_clear_if_token_spares_a_newer_session() {
        let context = SessionContext::new();
        context.establish(AuthToken::new("old"), ada());
        context.establish(AuthToken::new("new"), ada());

        assert!(!context.clear_if_token(&AuthToken::new("old")));
        assert_eq!(context.token(), Some(AuthToken::new("new")));

        assert!(context.clear_if_token(&AuthToken::new("new")));
        assert!(context.token().is_none());
    }
}
