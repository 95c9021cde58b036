//! Comments attached to an idea.

use crate::user::UserSummary;
use crate::wire;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment on an idea. Comments are never edited, only created or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    #[serde(default, deserialize_with = "wire::optional_id")]
    pub idea_id: Option<String>,
    pub content: String,
    #[serde(rename = "user")]
    pub author: UserSummary,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Whether `user_id` may delete this comment without the admin role.
    pub fn is_authored_by(&self, user_id: &str) -> bool {
        self.author.id == user_id
    }
}
