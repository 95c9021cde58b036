//! User identity as reported by the remote service.

use crate::wire;
use serde::{Deserialize, Serialize};

/// The signed-in account, as returned by `/users/me` and the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    /// Role flag; the only capability distinction the client knows about.
    #[serde(default, alias = "is_admin")]
    pub admin: bool,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    /// Name to display, falling back to the email when no name was set.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            email: Some(self.email.clone()),
        }
    }
}

/// Author information embedded in ideas and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}
