//! Busy guards for optimistic mutations.
//!
//! A mutation acquires a [`FlightGuard`] before touching the cache and keeps
//! it until the remote outcome has been applied. A second attempt on the same
//! key is rejected with [`FeedbackError::Busy`] instead of being queued.

use featureflow_core::{FeedbackError, Result};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum MutationKind {
    Vote,
    Comment,
    Status,
    Delete,
}

/// Target of a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Idea(String),
    Comment { idea_id: String, comment_id: String },
    RoadmapItem(String),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Idea(id) => write!(f, "idea:{}", id),
            EntityRef::Comment {
                idea_id,
                comment_id,
            } => write!(f, "idea:{}/comment:{}", idea_id, comment_id),
            EntityRef::RoadmapItem(id) => write!(f, "roadmap_item:{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlightKey {
    pub viewer: String,
    pub entity: EntityRef,
    /// `None` when every mutation kind on the entity shares one slot.
    pub kind: Option<MutationKind>,
}

impl fmt::Display for FlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Some(kind) => write!(f, "{} on {} by {}", kind, self.entity, self.viewer),
            None => write!(f, "mutation on {} by {}", self.entity, self.viewer),
        }
    }
}

/// Granularity of the busy guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlightPolicy {
    /// One in-flight mutation per (viewer, entity, kind).
    PerOperation,
    /// One in-flight mutation per (viewer, entity) regardless of kind.
    #[default]
    PerEntity,
}

impl FlightPolicy {
    pub fn from_serialize_flag(serialize_entity_mutations: bool) -> Self {
        if serialize_entity_mutations {
            FlightPolicy::PerEntity
        } else {
            FlightPolicy::PerOperation
        }
    }

    fn key(&self, viewer: &str, entity: EntityRef, kind: MutationKind) -> FlightKey {
        FlightKey {
            viewer: viewer.to_string(),
            entity,
            kind: match self {
                FlightPolicy::PerOperation => Some(kind),
                FlightPolicy::PerEntity => None,
            },
        }
    }
}

/// Set of keys with a mutation currently in flight.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    policy: FlightPolicy,
    active: Arc<Mutex<HashSet<FlightKey>>>,
}

impl InFlight {
    pub fn new(policy: FlightPolicy) -> Self {
        Self {
            policy,
            active: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn policy(&self) -> FlightPolicy {
        self.policy
    }

    /// Marks the key busy, or fails with `Busy` if it already is.
    pub fn try_acquire(
        &self,
        viewer: &str,
        entity: EntityRef,
        kind: MutationKind,
    ) -> Result<FlightGuard> {
        let key = self.policy.key(viewer, entity, kind);
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if !active.insert(key.clone()) {
            tracing::debug!(key = %key, "Rejected concurrent mutation");
            return Err(FeedbackError::busy(key.to_string()));
        }
        Ok(FlightGuard {
            key,
            active: Arc::clone(&self.active),
        })
    }

    pub fn is_busy(&self, viewer: &str, entity: EntityRef, kind: MutationKind) -> bool {
        let key = self.policy.key(viewer, entity, kind);
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&key)
    }

    pub fn active_count(&self) -> usize {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Releases its key when dropped, whatever the mutation outcome.
#[derive(Debug)]
pub struct FlightGuard {
    key: FlightKey,
    active: Arc<Mutex<HashSet<FlightKey>>>,
}

impl FlightGuard {
    pub fn key(&self) -> &FlightKey {
        &self.key
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
