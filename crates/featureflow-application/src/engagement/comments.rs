//! Comment loading, creation and deletion.

use super::EngagementStore;
use super::cache::BoardCache;
use crate::flight::{EntityRef, MutationKind};
use crate::optimistic::Mutation;
use featureflow_core::validation::normalize_comment;
use featureflow_core::{Comment, FeedbackError, Result};

/// Removed comment and where it sat in the newest-first list.
struct RemovedComment {
    index: usize,
    comment: Comment,
}

impl EngagementStore {
    /// Cached comments for an idea, newest first.
    pub async fn comments(&self, idea_id: &str) -> Vec<Comment> {
        self.cache_read()
            .await
            .comments
            .get(idea_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Fetches a page of comments. Page 1 replaces the cached list; later
    /// pages are appended after it.
    pub async fn load_comments(&self, idea_id: &str, page: u32) -> Result<Vec<Comment>> {
        let page = page.max(1);
        let fetched = self
            .reconciled(self.api.list_comments(idea_id, page).await)
            .await?;

        let mut cache = self.cache.write().await;
        let list = cache.comments.entry(idea_id.to_string()).or_default();
        if page == 1 {
            *list = fetched;
        } else {
            for comment in fetched {
                if !list.iter().any(|c| c.id == comment.id) {
                    list.push(comment);
                }
            }
        }
        Ok(list.clone())
    }

    /// Posts a comment and prepends the server's copy.
    ///
    /// Nothing is inserted before the service answers, since deletion needs
    /// the server-assigned id.
    pub async fn add_comment(&self, idea_id: &str, content: &str) -> Result<Comment> {
        let viewer = self.require_viewer("comment")?;
        let content = normalize_comment(content)?;
        let _guard = self.acquire(
            &viewer,
            EntityRef::Idea(idea_id.to_string()),
            MutationKind::Comment,
        )?;

        let comment = self
            .reconciled(self.api.create_comment(idea_id, &content).await)
            .await?;

        self.follow_session().await;
        let mut cache = self.cache.write().await;
        cache
            .comments
            .entry(idea_id.to_string())
            .or_default()
            .insert(0, comment.clone());
        cache.adjust_comment_count(idea_id, true);
        tracing::debug!(idea_id, comment_id = %comment.id, "Comment added");

        Ok(comment)
    }

    /// Deletes a comment authored by the viewer, or any comment as admin.
    ///
    /// The comment disappears immediately. On failure it is put back at its
    /// original index, except when the service reports it already gone.
    pub async fn delete_comment(&self, idea_id: &str, comment_id: &str) -> Result<()> {
        let viewer = self.require_viewer("delete comments")?;
        {
            let cache = self.cache_read().await;
            let comment = cache
                .find_comment(idea_id, comment_id)
                .ok_or_else(|| FeedbackError::not_found("comment", comment_id))?;
            if !comment.is_authored_by(&viewer.id) && !viewer.is_admin() {
                return Err(FeedbackError::forbidden(
                    "You can only delete your own comments",
                ));
            }
        }

        let guard = self.acquire(
            &viewer,
            EntityRef::Comment {
                idea_id: idea_id.to_string(),
                comment_id: comment_id.to_string(),
            },
            MutationKind::Delete,
        )?;

        let mutation = Mutation::apply(
            &self.cache,
            guard,
            "delete_comment",
            |cache: &mut BoardCache| {
                let list = cache
                    .comments
                    .get_mut(idea_id)
                    .ok_or_else(|| FeedbackError::not_found("comment", comment_id))?;
                let index = list
                    .iter()
                    .position(|c| c.id == comment_id)
                    .ok_or_else(|| FeedbackError::not_found("comment", comment_id))?;
                let comment = list.remove(index);
                cache.adjust_comment_count(idea_id, false);
                Ok(RemovedComment { index, comment })
            },
        )
        .await?;

        let outcome = self.api.delete_comment(idea_id, comment_id).await;
        let settled = mutation
            .settle(
                outcome,
                |_: &mut BoardCache, ()| (),
                |cache: &mut BoardCache, removed: RemovedComment, err| {
                    if err.is_not_found() {
                        return;
                    }
                    let list = cache.comments.entry(idea_id.to_string()).or_default();
                    let index = removed.index.min(list.len());
                    list.insert(index, removed.comment);
                    cache.adjust_comment_count(idea_id, true);
                },
            )
            .await;

        self.reconciled(settled).await
    }
}
