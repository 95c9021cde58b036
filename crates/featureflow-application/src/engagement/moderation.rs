//! Admin-only status changes and idea deletion.

use super::EngagementStore;
use super::cache::{BoardCache, EvictedIdea};
use crate::flight::{EntityRef, MutationKind};
use crate::optimistic::Mutation;
use featureflow_core::{FeedbackError, Idea, IdeaStatus, Result};

/// A deletion awaiting explicit confirmation.
///
/// The only way to obtain a [`ConfirmedDeletion`] is [`PendingDeletion::confirm`],
/// so an idea cannot be deleted without passing through a confirmation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeletion {
    idea_id: String,
    title: String,
}

impl PendingDeletion {
    pub fn idea_id(&self) -> &str {
        &self.idea_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Text to show when asking for confirmation.
    pub fn prompt(&self) -> String {
        format!(
            "Delete \"{}\"? This removes the idea and all of its comments and cannot be undone.",
            self.title
        )
    }

    pub fn confirm(self) -> ConfirmedDeletion {
        ConfirmedDeletion {
            idea_id: self.idea_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedDeletion {
    idea_id: String,
}

impl ConfirmedDeletion {
    pub fn idea_id(&self) -> &str {
        &self.idea_id
    }
}

impl EngagementStore {
    /// Sets any status on an idea. No transition order is enforced.
    pub async fn change_status(&self, idea_id: &str, status: IdeaStatus) -> Result<Idea> {
        let admin = self.require_admin("change idea status")?;
        let guard = self.acquire(
            &admin,
            EntityRef::Idea(idea_id.to_string()),
            MutationKind::Status,
        )?;
        self.follow_session().await;

        let mutation = Mutation::apply(
            &self.cache,
            guard,
            "change_status",
            |cache: &mut BoardCache| {
                let idea = cache
                    .ideas
                    .get_mut(idea_id)
                    .ok_or_else(|| FeedbackError::not_found("idea", idea_id))?;
                Ok(std::mem::replace(&mut idea.status, status))
            },
        )
        .await?;

        tracing::info!(idea_id, status = %status, "Changing idea status");
        let outcome = self.api.admin_change_status(idea_id, status).await;

        let settled = mutation
            .settle(
                outcome,
                |cache: &mut BoardCache, echoed: Option<Idea>| {
                    let cached = cache.ideas.get_mut(idea_id);
                    match (cached, echoed) {
                        (Some(idea), Some(echoed)) => {
                            idea.status = echoed.status;
                            Some(idea.clone())
                        }
                        (Some(idea), None) => Some(idea.clone()),
                        (None, echoed) => echoed,
                    }
                },
                |cache: &mut BoardCache, previous: IdeaStatus, _| {
                    if let Some(idea) = cache.ideas.get_mut(idea_id) {
                        idea.status = previous;
                    }
                },
            )
            .await;

        self.reconciled(settled)
            .await?
            .ok_or_else(|| FeedbackError::not_found("idea", idea_id))
    }

    /// Starts the two-step deletion of an idea.
    ///
    /// Loads the idea when it is not cached so the prompt can name it.
    pub async fn prepare_delete(&self, idea_id: &str) -> Result<PendingDeletion> {
        self.require_admin("delete ideas")?;

        let cached = self.cache_read().await.ideas.get(idea_id).cloned();
        let idea = match cached {
            Some(idea) => idea,
            None => self.load_idea(idea_id).await?,
        };

        Ok(PendingDeletion {
            idea_id: idea.id,
            title: idea.title,
        })
    }

    /// Hard-deletes a confirmed idea through the admin endpoint.
    ///
    /// The idea and its cached comments are removed at once. If the service
    /// rejects the deletion the idea is restored at its listing position but
    /// its comments stay discarded until refetched. A not-found answer means
    /// it is already gone, so nothing is restored.
    pub async fn delete_idea(&self, deletion: ConfirmedDeletion) -> Result<()> {
        let admin = self.require_admin("delete ideas")?;
        let idea_id = deletion.idea_id();
        let guard = self.acquire(
            &admin,
            EntityRef::Idea(idea_id.to_string()),
            MutationKind::Delete,
        )?;
        self.follow_session().await;

        let mutation = Mutation::apply(
            &self.cache,
            guard,
            "delete_idea",
            |cache: &mut BoardCache| Ok(cache.evict_idea(idea_id)),
        )
        .await?;

        tracing::info!(idea_id, "Deleting idea");
        let outcome = self.api.admin_delete_idea(idea_id).await;

        let settled = mutation
            .settle(
                outcome,
                |_: &mut BoardCache, ()| (),
                |cache: &mut BoardCache, evicted: Option<EvictedIdea>, err| {
                    if err.is_not_found() {
                        return;
                    }
                    if let Some(evicted) = evicted {
                        cache.restore_idea(evicted);
                    }
                },
            )
            .await;

        self.reconciled(settled).await
    }
}
