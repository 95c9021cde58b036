//! Public roadmap and its admin management.

use super::EngagementStore;
use featureflow_core::{FeedbackError, Result, RoadmapColumns, RoadmapItem, RoadmapItemDraft};

impl EngagementStore {
    /// Fetches a roadmap page. Page 1 replaces the cache; later pages append.
    pub async fn load_roadmap(&self, page: u32) -> Result<Vec<RoadmapItem>> {
        let page = page.max(1);
        let fetched = self.reconciled(self.api.list_roadmap(page).await).await?;

        let mut cache = self.cache.write().await;
        if page == 1 {
            cache.roadmap = fetched;
        } else {
            for item in fetched {
                if !cache.roadmap.iter().any(|existing| existing.id == item.id) {
                    cache.roadmap.push(item);
                }
            }
        }
        Ok(cache.roadmap.clone())
    }

    pub async fn load_roadmap_item(&self, item_id: &str) -> Result<RoadmapItem> {
        let item = self
            .reconciled(self.api.get_roadmap_item(item_id).await)
            .await?;
        self.cache.write().await.upsert_roadmap_item(item.clone());
        Ok(item)
    }

    pub async fn roadmap(&self) -> Vec<RoadmapItem> {
        self.cache.read().await.roadmap.clone()
    }

    /// Cached items grouped into planned, in-progress and completed columns.
    pub async fn roadmap_by_status(&self) -> RoadmapColumns {
        RoadmapColumns::from_items(&self.cache.read().await.roadmap)
    }

    pub async fn create_roadmap_item(&self, draft: RoadmapItemDraft) -> Result<RoadmapItem> {
        if draft.title.as_deref().is_none_or(|title| title.trim().is_empty()) {
            return Err(FeedbackError::validation(
                "title",
                "Please enter a title",
            ));
        }
        self.require_admin("manage the roadmap")?;

        let item = self
            .reconciled(self.api.admin_create_roadmap_item(&draft).await)
            .await?;
        tracing::info!(item_id = %item.id, "Roadmap item created");
        self.cache.write().await.roadmap.push(item.clone());
        Ok(item)
    }

    pub async fn update_roadmap_item(
        &self,
        item_id: &str,
        draft: RoadmapItemDraft,
    ) -> Result<RoadmapItem> {
        self.require_admin("manage the roadmap")?;

        let updated = self.api.admin_update_roadmap_item(item_id, &draft).await;
        let updated = self.reconciled(updated).await;

        let mut cache = self.cache.write().await;
        match &updated {
            Ok(item) => cache.upsert_roadmap_item(item.clone()),
            Err(err) if err.is_not_found() => {
                cache.roadmap.retain(|existing| existing.id != item_id);
            }
            Err(_) => {}
        }
        updated
    }

    pub async fn delete_roadmap_item(&self, item_id: &str) -> Result<()> {
        self.require_admin("manage the roadmap")?;

        let outcome = self.api.admin_delete_roadmap_item(item_id).await;
        let outcome = self.reconciled(outcome).await;

        // Already gone on the server counts as deleted locally.
        if outcome.is_ok() || outcome.as_ref().is_err_and(FeedbackError::is_not_found) {
            self.cache
                .write()
                .await
                .roadmap
                .retain(|existing| existing.id != item_id);
        }
        if outcome.is_ok() {
            tracing::info!(item_id, "Roadmap item deleted");
        }
        outcome
    }
}
