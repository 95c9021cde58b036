//! Shared fixtures for application-layer tests.
#![allow(dead_code)]

use featureflow_application::{BoardApi, EngagementStore, FlightPolicy, SessionStore};
use featureflow_core::{
    ApiRequest, FeedbackError, MemoryTokenStore, RemoteGateway, Result, SessionContext,
};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

enum Reply {
    Ready(Result<Value>),
    Held(oneshot::Receiver<Result<Value>>),
}

/// Gateway double answering from per-route queues.
///
/// Routes are `METHOD /path`. Requests to unscripted routes fail with an
/// internal error so tests notice unexpected traffic.
#[derive(Default)]
pub struct ScriptedGateway {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, route: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .entry(route.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn reply(&self, route: &str, payload: Value) {
        self.push(route, Reply::Ready(Ok(payload)));
    }

    pub fn fail(&self, route: &str, err: FeedbackError) {
        self.push(route, Reply::Ready(Err(err)));
    }

    /// Queues a reply that stays pending until the returned sender fires.
    pub fn hold(&self, route: &str) -> oneshot::Sender<Result<Value>> {
        let (tx, rx) = oneshot::channel();
        self.push(route, Reply::Held(rx));
        tx
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn calls_to(&self, route: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.route() == route)
            .count()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait::async_trait]
impl RemoteGateway for ScriptedGateway {
    async fn request(&self, request: ApiRequest) -> Result<Value> {
        let route = request.route();
        self.requests.lock().unwrap().push(request);

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&route)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Held(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(FeedbackError::transport("reply dropped"))),
            None => Err(FeedbackError::internal(format!(
                "unscripted request: {}",
                route
            ))),
        }
    }
}

// ============================================================================
// Payload fixtures
// ============================================================================

pub fn user_json(id: u64, admin: bool) -> Value {
    json!({
        "id": id,
        "email": format!("user{}@example.com", id),
        "name": format!("User {}", id),
        "admin": admin
    })
}

pub fn idea_json(id: &str, votes: u32, voted: bool) -> Value {
    json!({
        "id": id,
        "title": format!("Idea number {}", id),
        "description": "A description that is comfortably long enough",
        "category": "feature",
        "status": "submitted",
        "votes_count": votes,
        "user_has_voted": voted,
        "comments_count": 0,
        "created_at": "2025-01-15T10:00:00Z",
        "user": {"id": 99, "name": "Author"}
    })
}

pub fn comment_json(id: &str, author_id: u64) -> Value {
    json!({
        "id": id,
        "content": format!("Comment {}", id),
        "user": {"id": author_id, "name": format!("User {}", author_id)},
        "created_at": "2025-01-16T10:00:00Z"
    })
}

// ============================================================================
// Store wiring
// ============================================================================

pub struct Harness {
    pub gateway: Arc<ScriptedGateway>,
    pub tokens: Arc<MemoryTokenStore>,
    pub session: Arc<SessionStore>,
    pub store: EngagementStore,
}

impl Harness {
    pub fn anonymous(policy: FlightPolicy) -> Self {
        let gateway = ScriptedGateway::new();
        let tokens = Arc::new(MemoryTokenStore::new());
        let api = Arc::new(BoardApi::new(
            gateway.clone(),
            Arc::new(SessionContext::new()),
        ));
        let session = Arc::new(SessionStore::new(api, tokens.clone()));
        let store = EngagementStore::new(Arc::clone(&session), policy);

        Self {
            gateway,
            tokens,
            session,
            store,
        }
    }

    /// Harness whose session is signed in as user `id`.
    pub async fn signed_in(id: u64, admin: bool, policy: FlightPolicy) -> Self {
        let harness = Self::anonymous(policy);
        harness.login_as(id, admin).await;
        harness
    }

    /// Signs in as user `id`, who receives the token `token-{id}`.
    pub async fn login_as(&self, id: u64, admin: bool) {
        self.gateway.reply(
            "POST /auth/sign_in",
            json!({"user": user_json(id, admin), "token": format!("token-{}", id)}),
        );
        self.session
            .login(&format!("user{}@example.com", id), "password123")
            .await
            .unwrap();
    }

    /// Loads a trending listing containing `ideas`.
    pub async fn with_listing(&self, ideas: Vec<Value>) {
        self.gateway.reply("GET /ideas/trending", Value::Array(ideas));
        self.store.load_trending(1).await.unwrap();
    }

    /// Loads a comment list for `idea_id`.
    pub async fn with_comments(&self, idea_id: &str, comments: Vec<Value>) {
        self.gateway.reply(
            &format!("GET /ideas/{}/comments", idea_id),
            Value::Array(comments),
        );
        self.store.load_comments(idea_id, 1).await.unwrap();
    }

    pub async fn vote_state(&self, idea_id: &str) -> (u32, bool) {
        let idea = self.store.idea(idea_id).await.unwrap();
        (idea.vote_count, idea.viewer_has_voted)
    }
}
