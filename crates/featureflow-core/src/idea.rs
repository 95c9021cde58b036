//! Idea domain model: the central voteable entity.

use crate::user::UserSummary;
use crate::wire;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Vote count above which an idea is badged as trending.
///
/// Purely a display hint; trending order itself comes from the service.
pub const TRENDING_BADGE_THRESHOLD: u32 = 20;

/// Moderation status of an idea.
///
/// Admins may move an idea between any two statuses; there is no workflow
/// ordering enforced client-side.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IdeaStatus {
    #[default]
    Submitted,
    Planned,
    InProgress,
    Completed,
    Rejected,
}

impl IdeaStatus {
    /// Human label, e.g. `In Progress`.
    pub fn label(&self) -> &'static str {
        match self {
            IdeaStatus::Submitted => "Submitted",
            IdeaStatus::Planned => "Planned",
            IdeaStatus::InProgress => "In Progress",
            IdeaStatus::Completed => "Completed",
            IdeaStatus::Rejected => "Rejected",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    #[default]
    Feature,
    Improvement,
    Bug,
    Other,
}

/// An idea as cached by the client.
///
/// `vote_count` and `viewer_has_voted` are only mutated through the
/// engagement store's vote operations; `viewer_has_voted` is scoped to the
/// session that fetched it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub status: IdeaStatus,
    #[serde(rename = "votes_count", default, deserialize_with = "wire::count")]
    pub vote_count: u32,
    #[serde(rename = "user_has_voted", default)]
    pub viewer_has_voted: bool,
    #[serde(rename = "comments_count", default, deserialize_with = "wire::count")]
    pub comment_count: u32,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "user", default, skip_serializing_if = "Option::is_none")]
    pub author: Option<UserSummary>,
}

impl Idea {
    pub fn is_trending_badge(&self) -> bool {
        self.vote_count > TRENDING_BADGE_THRESHOLD
    }

    /// Case-insensitive substring match on title or description.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }

    pub fn is_authored_by(&self, user_id: &str) -> bool {
        self.author.as_ref().is_some_and(|a| a.id == user_id)
    }
}

/// Body of `POST /ideas`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewIdea {
    pub title: String,
    pub description: String,
    pub category: Category,
}

impl NewIdea {
    pub fn new(title: impl Into<String>, description: impl Into<String>, category: Category) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category,
        }
    }
}

/// Server-side filter for `GET /ideas`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdeaFilter {
    pub status: Option<IdeaStatus>,
    pub category: Option<Category>,
    pub page: Option<u32>,
}

impl IdeaFilter {
    pub fn with_status(mut self, status: IdeaStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Query pairs with unset fields omitted.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status".to_string(), status.to_string()));
        }
        if let Some(category) = self.category {
            pairs.push(("category".to_string(), category.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        pairs
    }
}

/// Which retrieval produced the current board listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingMode {
    /// Remote-ranked; order is opaque to the client.
    Trending { page: u32 },
    Recent { page: u32 },
    Filtered(IdeaFilter),
    /// Moderation listing from `/admin/ideas`.
    Admin { page: u32 },
}
