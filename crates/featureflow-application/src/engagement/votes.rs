//! Exactly-once vote toggle.

use super::EngagementStore;
use super::cache::BoardCache;
use crate::flight::{EntityRef, MutationKind};
use crate::optimistic::Mutation;
use featureflow_core::{FeedbackError, Idea, Result};

/// `(vote_count, viewer_has_voted)` before the optimistic change.
type VoteSnapshot = (u32, bool);

impl EngagementStore {
    /// Casts the viewer's vote on a cached idea.
    ///
    /// The count is incremented before the remote call returns and restored
    /// to its exact prior value if the call fails.
    pub async fn vote(&self, idea_id: &str) -> Result<Idea> {
        self.toggle_vote(idea_id, true).await
    }

    /// Withdraws the viewer's vote. Symmetric to [`vote`](Self::vote).
    pub async fn unvote(&self, idea_id: &str) -> Result<Idea> {
        self.toggle_vote(idea_id, false).await
    }

    async fn toggle_vote(&self, idea_id: &str, voting: bool) -> Result<Idea> {
        let viewer = self.require_viewer("vote")?;
        let guard = self.acquire(
            &viewer,
            EntityRef::Idea(idea_id.to_string()),
            MutationKind::Vote,
        )?;
        let label = if voting { "vote" } else { "unvote" };
        let scope = self.follow_session().await;

        let mutation = Mutation::apply(&self.cache, guard, label, |cache: &mut BoardCache| {
            let idea = cache
                .ideas
                .get_mut(idea_id)
                .ok_or_else(|| FeedbackError::not_found("idea", idea_id))?;

            if idea.viewer_has_voted == voting {
                let message = if voting {
                    "You have already voted for this idea"
                } else {
                    "You have not voted for this idea"
                };
                return Err(FeedbackError::validation("vote", message));
            }

            let snapshot: VoteSnapshot = (idea.vote_count, idea.viewer_has_voted);
            idea.vote_count = if voting {
                idea.vote_count.saturating_add(1)
            } else {
                idea.vote_count.saturating_sub(1)
            };
            idea.viewer_has_voted = voting;
            Ok(snapshot)
        })
        .await?;

        tracing::debug!(idea_id, kind = label, "Dispatching vote toggle");
        let outcome = if voting {
            self.api.vote(idea_id).await
        } else {
            self.api.unvote(idea_id).await
        };

        let settled = mutation
            .settle(
                outcome,
                // The optimistic values stay authoritative; the payload only
                // stands in if the idea was evicted meanwhile.
                |cache: &mut BoardCache, echoed: Option<Idea>| {
                    cache.ideas.get(idea_id).cloned().or(echoed)
                },
                |cache: &mut BoardCache, (count, voted): VoteSnapshot, _| {
                    if !cache.is_scoped_to(&scope) {
                        return;
                    }
                    if let Some(idea) = cache.ideas.get_mut(idea_id) {
                        idea.vote_count = count;
                        idea.viewer_has_voted = voted;
                    }
                },
            )
            .await;

        self.reconciled(settled)
            .await?
            .ok_or_else(|| FeedbackError::not_found("idea", idea_id))
    }
}
