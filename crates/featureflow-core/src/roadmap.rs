//! Admin-curated roadmap items.

use crate::wire;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

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
pub enum RoadmapStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapItem {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: RoadmapStatus,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    /// Visual intensity only; the client never sorts by it.
    #[serde(default, deserialize_with = "wire::count")]
    pub priority: u32,
    #[serde(default, deserialize_with = "wire::optional_id")]
    pub idea_id: Option<String>,
}

/// Admin payload for creating or updating a roadmap item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoadmapItemDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RoadmapStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idea_id: Option<String>,
}

/// Roadmap items bucketed by status, server order kept within each bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoadmapColumns {
    pub planned: Vec<RoadmapItem>,
    pub in_progress: Vec<RoadmapItem>,
    pub completed: Vec<RoadmapItem>,
}

impl RoadmapColumns {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a RoadmapItem>) -> Self {
        let mut columns = Self::default();
        for item in items {
            let column = match item.status {
                RoadmapStatus::Planned => &mut columns.planned,
                RoadmapStatus::InProgress => &mut columns.in_progress,
                RoadmapStatus::Completed => &mut columns.completed,
            };
            column.push(item.clone());
        }
        columns
    }

    pub fn is_empty(&self) -> bool {
        self.planned.is_empty() && self.in_progress.is_empty() && self.completed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, status: RoadmapStatus, priority: u32) -> RoadmapItem {
        RoadmapItem {
            id: id.to_string(),
            title: format!("Item {}", id),
            description: None,
            status,
            target_date: None,
            priority,
            idea_id: None,
        }
    }

    #[test]
    fn test_deserialize_roadmap_item() {
        let parsed: RoadmapItem = serde_json::from_str(
            r#"{"id": 1, "title": "SSO", "status": "in_progress", "target_date": "2025-06-30", "priority": 3, "idea_id": 42}"#,
        )
        .unwrap();

        assert_eq!(parsed.status, RoadmapStatus::InProgress);
        assert_eq!(parsed.target_date, NaiveDate::from_ymd_opt(2025, 6, 30));
        assert_eq!(parsed.idea_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_columns_keep_server_order() {
        let items = vec![
            item("a", RoadmapStatus::Completed, 1),
            item("b", RoadmapStatus::Planned, 0),
            item("c", RoadmapStatus::Planned, 5),
            item("d", RoadmapStatus::InProgress, 2),
        ];

        let columns = RoadmapColumns::from_items(&items);
        let planned: Vec<_> = columns.planned.iter().map(|i| i.id.as_str()).collect();

        assert_eq!(planned, vec!["b", "c"]);
        assert_eq!(columns.in_progress.len(), 1);
        assert_eq!(columns.completed[0].id, "a");
    }

    #[test]
    fn test_draft_omits_unset_fields() {
        let draft = RoadmapItemDraft {
            status: Some(RoadmapStatus::Completed),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            serde_json::json!({"status": "completed"})
        );
    }
}
