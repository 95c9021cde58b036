//! Board retrieval, search and idea submission.

use super::EngagementStore;
use featureflow_core::validation::validate_idea;
use featureflow_core::{
    Category, Idea, IdeaFilter, IdeaStatus, ListingMode, NewIdea, Result, Session,
};
use strum::IntoEnumIterator;

/// Figures for the admin dashboard, computed over the current listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardStats {
    pub total: usize,
    pub voted_by_viewer: usize,
    /// One entry per status, in declaration order, zero counts included.
    pub by_status: Vec<(IdeaStatus, usize)>,
}

impl BoardStats {
    fn from_ideas(ideas: &[Idea]) -> Self {
        let by_status = IdeaStatus::iter()
            .map(|status| {
                let count = ideas.iter().filter(|idea| idea.status == status).count();
                (status, count)
            })
            .collect();

        Self {
            total: ideas.len(),
            voted_by_viewer: ideas.iter().filter(|idea| idea.viewer_has_voted).count(),
            by_status,
        }
    }

    pub fn count(&self, status: IdeaStatus) -> usize {
        self.by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map_or(0, |(_, count)| *count)
    }
}

impl EngagementStore {
    /// Remote-ranked listing; the order is taken as given.
    pub async fn load_trending(&self, page: u32) -> Result<Vec<Idea>> {
        let page = page.max(1);
        let scope = self.follow_session().await;
        let ideas = self.reconciled(self.api.trending(page).await).await?;
        Ok(self
            .replace_listing(&scope, ListingMode::Trending { page }, ideas)
            .await)
    }

    pub async fn load_recent(&self, page: u32) -> Result<Vec<Idea>> {
        let page = page.max(1);
        let scope = self.follow_session().await;
        let ideas = self.reconciled(self.api.recent(page).await).await?;
        Ok(self
            .replace_listing(&scope, ListingMode::Recent { page }, ideas)
            .await)
    }

    /// Server-side filtered listing by status and/or category.
    pub async fn load_filtered(&self, filter: IdeaFilter) -> Result<Vec<Idea>> {
        let scope = self.follow_session().await;
        let ideas = self.reconciled(self.api.list_ideas(&filter).await).await?;
        Ok(self
            .replace_listing(&scope, ListingMode::Filtered(filter), ideas)
            .await)
    }

    pub async fn load_admin_ideas(&self, page: u32) -> Result<Vec<Idea>> {
        self.require_admin("view the moderation queue")?;
        let page = page.max(1);
        let scope = self.follow_session().await;
        let ideas = self
            .reconciled(self.api.admin_list_ideas(page).await)
            .await?;
        Ok(self
            .replace_listing(&scope, ListingMode::Admin { page }, ideas)
            .await)
    }

    /// Caches a listing fetched under `scope`. A listing that arrives after
    /// the session changed is returned but not cached.
    async fn replace_listing(
        &self,
        scope: &Session,
        mode: ListingMode,
        ideas: Vec<Idea>,
    ) -> Vec<Idea> {
        tracing::debug!(mode = ?mode, count = ideas.len(), "Listing loaded");
        match self.cache_for(scope).await {
            Some(mut cache) => {
                cache.replace_listing(mode, ideas);
                cache.listed_ideas()
            }
            None => ideas,
        }
    }

    /// Fetches one idea and refreshes its cached copy.
    pub async fn load_idea(&self, idea_id: &str) -> Result<Idea> {
        let scope = self.follow_session().await;
        let idea = self.reconciled(self.api.get_idea(idea_id).await).await?;
        if let Some(mut cache) = self.cache_for(&scope).await {
            cache.upsert_idea(idea.clone());
        }
        Ok(idea)
    }

    /// Submits a new idea and places it at the head of the listing.
    pub async fn create_idea(
        &self,
        title: &str,
        description: &str,
        category: Category,
    ) -> Result<Idea> {
        validate_idea(title, description)?;
        self.require_viewer("submit an idea")?;

        let draft = NewIdea::new(title.trim(), description.trim(), category);
        let scope = self.follow_session().await;
        let idea = self.reconciled(self.api.create_idea(&draft).await).await?;

        tracing::info!(idea_id = %idea.id, "Idea submitted");
        if let Some(mut cache) = self.cache_for(&scope).await {
            cache.prepend_to_listing(idea.clone());
        }
        Ok(idea)
    }

    // ============================================================================
    // Cache queries
    // ============================================================================

    pub async fn idea(&self, idea_id: &str) -> Option<Idea> {
        self.cache_read().await.ideas.get(idea_id).cloned()
    }

    /// The current listing in server order.
    pub async fn listing(&self) -> Vec<Idea> {
        self.cache_read().await.listed_ideas()
    }

    pub async fn listing_mode(&self) -> Option<ListingMode> {
        self.cache_read().await.mode.clone()
    }

    /// Case-insensitive title/description filter over the listing.
    ///
    /// Matches keep their listing order; a blank query returns everything.
    pub async fn search(&self, query: &str) -> Vec<Idea> {
        self.listing()
            .await
            .into_iter()
            .filter(|idea| idea.matches_query(query))
            .collect()
    }

    pub async fn board_stats(&self) -> BoardStats {
        BoardStats::from_ideas(&self.listing().await)
    }
}
