//! Domain layer for the Feature Flow feedback client.
//!
//! Holds the entity models, local validation rules, the shared error type
//! and the contracts (`RemoteGateway`, `TokenStore`) implemented by the
//! infrastructure crate.

pub mod comment;
pub mod config;
pub mod error;
pub mod gateway;
pub mod idea;
pub mod roadmap;
pub mod session;
pub mod token;
pub mod user;
pub mod validation;
mod wire;

// Re-export common error type
pub use error::{FeedbackError, Result};

pub use comment::Comment;
pub use config::ClientConfig;
pub use gateway::{ApiRequest, HttpMethod, RemoteGateway};
pub use idea::{Category, Idea, IdeaFilter, IdeaStatus, ListingMode, NewIdea};
pub use roadmap::{RoadmapColumns, RoadmapItem, RoadmapItemDraft, RoadmapStatus};
pub use session::{AuthState, AuthToken, Session, SessionContext};
pub use token::{MemoryTokenStore, TokenStore};
pub use user::{User, UserSummary};
