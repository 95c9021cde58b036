//! In-memory board state owned by the engagement store.

use featureflow_core::{Comment, Idea, ListingMode, RoadmapItem, Session};
use std::collections::HashMap;

/// Ideas keyed by id plus the ordered listing currently shown.
///
/// `listing` holds ids in server order; it is never re-sorted locally.
#[derive(Debug, Default)]
pub(crate) struct BoardCache {
    pub ideas: HashMap<String, Idea>,
    pub listing: Vec<String>,
    pub mode: Option<ListingMode>,
    /// Newest-first comment lists per idea.
    pub comments: HashMap<String, Vec<Comment>>,
    pub roadmap: Vec<RoadmapItem>,
    /// Session whose viewer `viewer_has_voted` describes.
    session: Session,
}

/// An idea removed from the cache, with its former listing position.
#[derive(Debug, Clone)]
pub(crate) struct EvictedIdea {
    pub idea: Idea,
    pub position: Option<usize>,
}

impl BoardCache {
    pub fn is_scoped_to(&self, session: &Session) -> bool {
        self.session == *session
    }

    /// Rebinds viewer-scoped state to `session`. Returns `true` on a change.
    ///
    /// Signing out keeps the ideas with every vote flag cleared. Any other
    /// change drops ideas and the listing, since the new viewer's flags are
    /// unknown until refetched.
    pub fn follow_session(&mut self, session: &Session) -> bool {
        if self.is_scoped_to(session) {
            return false;
        }
        if session.is_authenticated() {
            self.ideas.clear();
            self.listing.clear();
            self.mode = None;
        } else {
            for idea in self.ideas.values_mut() {
                idea.viewer_has_voted = false;
            }
        }
        self.session = session.clone();
        true
    }

    pub fn upsert_idea(&mut self, idea: Idea) {
        self.ideas.insert(idea.id.clone(), idea);
    }

    /// Replaces the listing with `ideas`, keeping their order.
    pub fn replace_listing(&mut self, mode: ListingMode, ideas: Vec<Idea>) {
        self.listing = ideas.iter().map(|idea| idea.id.clone()).collect();
        for idea in ideas {
            self.upsert_idea(idea);
        }
        self.mode = Some(mode);
    }

    pub fn prepend_to_listing(&mut self, idea: Idea) {
        self.listing.retain(|id| *id != idea.id);
        self.listing.insert(0, idea.id.clone());
        self.upsert_idea(idea);
    }

    pub fn listed_ideas(&self) -> Vec<Idea> {
        self.listing
            .iter()
            .filter_map(|id| self.ideas.get(id))
            .cloned()
            .collect()
    }

    /// Removes an idea along with its listing entry and cached comments.
    pub fn evict_idea(&mut self, id: &str) -> Option<EvictedIdea> {
        self.comments.remove(id);
        let position = self.listing.iter().position(|listed| listed == id);
        if let Some(index) = position {
            self.listing.remove(index);
        }
        self.ideas
            .remove(id)
            .map(|idea| EvictedIdea { idea, position })
    }

    /// Puts an evicted idea back at its former position.
    pub fn restore_idea(&mut self, evicted: EvictedIdea) {
        let EvictedIdea { idea, position } = evicted;
        if let Some(index) = position
            && !self.listing.contains(&idea.id)
        {
            let index = index.min(self.listing.len());
            self.listing.insert(index, idea.id.clone());
        }
        self.upsert_idea(idea);
    }

    /// Replaces an item in place, or appends it when not cached.
    pub fn upsert_roadmap_item(&mut self, item: RoadmapItem) {
        match self.roadmap.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => self.roadmap.push(item),
        }
    }

    pub fn find_comment(&self, idea_id: &str, comment_id: &str) -> Option<&Comment> {
        self.comments
            .get(idea_id)?
            .iter()
            .find(|comment| comment.id == comment_id)
    }

    pub fn adjust_comment_count(&mut self, idea_id: &str, increment: bool) {
        if let Some(idea) = self.ideas.get_mut(idea_id) {
            idea.comment_count = if increment {
                idea.comment_count.saturating_add(1)
            } else {
                idea.comment_count.saturating_sub(1)
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use featureflow_core::{AuthToken, User};

    fn idea(id: &str) -> Idea {
        Idea {
            id: id.to_string(),
            title: format!("Idea {}", id),
            description: String::new(),
            category: Default::default(),
            status: Default::default(),
            vote_count: 0,
            viewer_has_voted: false,
            comment_count: 0,
            created_at: Utc::now(),
            author: None,
        }
    }

    fn ids(cache: &BoardCache) -> Vec<String> {
        cache.listed_ideas().into_iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_replace_listing_keeps_server_order() {
        let mut cache = BoardCache::default();
        cache.replace_listing(
            ListingMode::Trending { page: 1 },
            vec![idea("3"), idea("1"), idea("2")],
        );
        assert_eq!(ids(&cache), vec!["3", "1", "2"]);
    }

    #[test]
    fn test_evict_then_restore_returns_to_position() {
        let mut cache = BoardCache::default();
        cache.replace_listing(
            ListingMode::Recent { page: 1 },
            vec![idea("a"), idea("b"), idea("c")],
        );
        cache.comments.insert("b".into(), Vec::new());

        let evicted = cache.evict_idea("b").unwrap();
        assert_eq!(evicted.position, Some(1));
        assert_eq!(ids(&cache), vec!["a", "c"]);
        assert!(!cache.comments.contains_key("b"));

        cache.restore_idea(evicted);
        assert_eq!(ids(&cache), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_prepend_moves_existing_entry() {
        let mut cache = BoardCache::default();
        cache.replace_listing(ListingMode::Recent { page: 1 }, vec![idea("a"), idea("b")]);
        cache.prepend_to_listing(idea("b"));
        assert_eq!(ids(&cache), vec!["b", "a"]);
    }

    fn signed_in(id: &str) -> Session {
        Session::authenticated(
            AuthToken::new(format!("token-{}", id)),
            User {
                id: id.to_string(),
                email: format!("user{}@example.com", id),
                name: format!("User {}", id),
                admin: false,
            },
        )
    }

    fn voted(id: &str) -> Idea {
        Idea {
            viewer_has_voted: true,
            vote_count: 3,
            ..idea(id)
        }
    }

    #[test]
    fn test_sign_out_clears_vote_flags_but_keeps_listing() {
        let mut cache = BoardCache::default();
        assert!(cache.follow_session(&signed_in("1")));
        cache.replace_listing(ListingMode::Recent { page: 1 }, vec![voted("a"), idea("b")]);

        assert!(cache.follow_session(&Session::anonymous()));

        assert_eq!(ids(&cache), vec!["a", "b"]);
        let a = &cache.ideas["a"];
        assert_eq!((a.vote_count, a.viewer_has_voted), (3, false));
    }

    #[test]
    fn test_switching_viewer_drops_ideas() {
        let mut cache = BoardCache::default();
        cache.follow_session(&signed_in("1"));
        cache.replace_listing(ListingMode::Trending { page: 1 }, vec![voted("a")]);
        cache.comments.insert("a".to_string(), Vec::new());

        assert!(cache.follow_session(&signed_in("2")));
        assert!(!cache.follow_session(&signed_in("2")));

        assert!(cache.ideas.is_empty());
        assert!(cache.listed_ideas().is_empty());
        assert!(cache.mode.is_none());
        assert!(cache.comments.contains_key("a"));
    }
}
