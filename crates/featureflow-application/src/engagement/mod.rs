//! Engagement store: cached ideas, comments and roadmap items with
//! optimistic mutations.
//!
//! Every mutation is gated by an explicit role check, serialized by the busy
//! guard and applied through [`Mutation`](crate::optimistic::Mutation) so the
//! cache ends either fully applied or fully rolled back.

mod cache;
mod comments;
mod listing;
mod moderation;
mod roadmap;
mod votes;

pub use listing::BoardStats;
pub use moderation::{ConfirmedDeletion, PendingDeletion};

use crate::api::BoardApi;
use crate::flight::{EntityRef, FlightGuard, FlightPolicy, InFlight, MutationKind};
use crate::session_store::SessionStore;
use cache::BoardCache;
use featureflow_core::{FeedbackError, Result, Session, User};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub struct EngagementStore {
    api: Arc<BoardApi>,
    session: Arc<SessionStore>,
    cache: RwLock<BoardCache>,
    flights: InFlight,
}

impl EngagementStore {
    pub fn new(session: Arc<SessionStore>, policy: FlightPolicy) -> Self {
        Self {
            api: Arc::clone(session.api()),
            session,
            cache: RwLock::new(BoardCache::default()),
            flights: InFlight::new(policy),
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn flight_policy(&self) -> FlightPolicy {
        self.flights.policy()
    }

    /// Whether a mutation of `kind` on `entity` is in flight for the viewer.
    ///
    /// Front ends use this to disable the triggering control.
    pub fn is_busy(&self, entity: EntityRef, kind: MutationKind) -> bool {
        match self.session.current_user() {
            Some(viewer) => self.flights.is_busy(&viewer.id, entity, kind),
            None => false,
        }
    }

    // ============================================================================
    // Session scoping
    // ============================================================================

    /// Aligns the cache with the live session and returns that session.
    async fn follow_session(&self) -> Session {
        let session = self.session.context().snapshot();
        let mut cache = self.cache.write().await;
        if cache.follow_session(&session) {
            tracing::debug!(
                authenticated = session.is_authenticated(),
                "Session changed; discarded viewer-scoped ideas"
            );
        }
        session
    }

    async fn cache_read(&self) -> RwLockReadGuard<'_, BoardCache> {
        self.follow_session().await;
        self.cache.read().await
    }

    /// Write access for results fetched under `scope`.
    ///
    /// `None` once the session has moved on, so a late reply never writes
    /// one viewer's vote flags into another viewer's cache.
    async fn cache_for(&self, scope: &Session) -> Option<RwLockWriteGuard<'_, BoardCache>> {
        let current = self.session.context().snapshot();
        let mut cache = self.cache.write().await;
        cache.follow_session(&current);
        (current == *scope).then_some(cache)
    }

    // ============================================================================
    // Role gates
    // ============================================================================

    fn require_viewer(&self, action: &str) -> Result<User> {
        self.session
            .current_user()
            .ok_or_else(|| FeedbackError::sign_in_required(action))
    }

    fn require_admin(&self, action: &str) -> Result<User> {
        let user = self.require_viewer(action)?;
        if !user.is_admin() {
            tracing::debug!(user_id = %user.id, action, "Rejected non-admin mutation");
            return Err(FeedbackError::forbidden(format!(
                "Only admins can {}",
                action
            )));
        }
        Ok(user)
    }

    fn acquire(&self, viewer: &User, entity: EntityRef, kind: MutationKind) -> Result<FlightGuard> {
        self.flights.try_acquire(&viewer.id, entity, kind)
    }

    /// Applies the cross-cutting consequences of a failed remote call.
    ///
    /// A rejected token ends the session it belongs to, and only that one; a
    /// missing idea is evicted so it is not retried from stale state.
    async fn reconcile(&self, err: &FeedbackError) {
        if let Some(token) = err.rejected_token()
            && !self.session.invalidate_if_current(token)
        {
            tracing::debug!("Ignored a 401 for a session that has already ended");
        }
        if let FeedbackError::NotFound {
            entity_type: "idea",
            id,
        } = err
            && self.cache.write().await.evict_idea(id).is_some()
        {
            tracing::info!(idea_id = %id, "Evicted idea missing on the server");
        }
    }

    /// Passes `outcome` through, reconciling first when it is a failure.
    async fn reconciled<T>(&self, outcome: Result<T>) -> Result<T> {
        if let Err(err) = &outcome {
            self.reconcile(err).await;
        }
        outcome
    }
}
