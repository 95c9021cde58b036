//! Typed endpoint layer over the remote gateway.
//!
//! `BoardApi` maps each remote operation to an [`ApiRequest`] and decodes the
//! payload into domain types. The bearer token is read from the shared
//! [`SessionContext`] at call time, so a logout during an in-flight request
//! only affects the next call.

use featureflow_core::{
    ApiRequest, AuthToken, Comment, FeedbackError, Idea, IdeaFilter, IdeaStatus, NewIdea,
    RemoteGateway, Result, RoadmapItem, RoadmapItemDraft, SessionContext, User,
};
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;

/// Throwaway origin used only to encode request paths.
const PATH_BASE: &str = "http://featureflow.invalid/";

/// Successful signup/login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    #[serde(alias = "access_token")]
    pub token: AuthToken,
}

/// Remote API client for ideas, comments, roadmap and admin endpoints.
pub struct BoardApi {
    gateway: Arc<dyn RemoteGateway>,
    session: Arc<SessionContext>,
}

impl BoardApi {
    pub fn new(gateway: Arc<dyn RemoteGateway>, session: Arc<SessionContext>) -> Self {
        Self { gateway, session }
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    // ============================================================================
    // Dispatch helpers
    // ============================================================================

    /// Sends with the current session token attached.
    ///
    /// A 401 carries the token that was sent, so callers can tell a stale
    /// rejection from one aimed at the live session.
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let token = self.session.token();
        self.gateway
            .request(request.bearer(token.clone()))
            .await
            .map_err(|err| err.with_rejected_token(token))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        decode(self.send(request).await?)
    }

    /// Sends and discards whatever acknowledgement the service returns.
    async fn send_ack(&self, request: ApiRequest) -> Result<()> {
        self.send(request).await.map(|_| ())
    }

    // ============================================================================
    // Auth
    // ============================================================================

    pub async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<AuthPayload> {
        let request = ApiRequest::post("/auth").json(&json!({
            "email": email,
            "password": password,
            "name": name,
        }))?;
        decode_auth(self.gateway.request(request).await?)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthPayload> {
        let request = ApiRequest::post("/auth/sign_in").json(&json!({
            "email": email,
            "password": password,
        }))?;
        decode_auth(self.gateway.request(request).await?)
    }

    /// Validates `token` by fetching the account it belongs to.
    pub async fn current_user(&self, token: &AuthToken) -> Result<User> {
        let request = ApiRequest::get("/users/me").bearer(Some(token.clone()));
        decode(self.gateway.request(request).await?)
    }

    // ============================================================================
    // Ideas
    // ============================================================================

    pub async fn list_ideas(&self, filter: &IdeaFilter) -> Result<Vec<Idea>> {
        self.fetch(ApiRequest::get("/ideas").query_pairs(filter.query_pairs()))
            .await
    }

    pub async fn trending(&self, page: u32) -> Result<Vec<Idea>> {
        self.fetch(ApiRequest::get("/ideas/trending").query("page", page))
            .await
    }

    pub async fn recent(&self, page: u32) -> Result<Vec<Idea>> {
        self.fetch(ApiRequest::get("/ideas/recent").query("page", page))
            .await
    }

    pub async fn get_idea(&self, id: &str) -> Result<Idea> {
        self.fetch(ApiRequest::get(resource_path(&["ideas", id])?))
            .await
            .map_err(|e| e.for_entity("idea", id))
    }

    pub async fn create_idea(&self, idea: &NewIdea) -> Result<Idea> {
        self.fetch(ApiRequest::post("/ideas").json(&json!({ "idea": idea }))?)
            .await
    }

    /// Returns the updated idea when the service echoes one.
    pub async fn vote(&self, id: &str) -> Result<Option<Idea>> {
        let payload = self
            .send(ApiRequest::post(resource_path(&["ideas", id, "vote"])?))
            .await
            .map_err(|e| e.for_entity("idea", id))?;
        Ok(decode_optional(payload))
    }

    pub async fn unvote(&self, id: &str) -> Result<Option<Idea>> {
        let payload = self
            .send(ApiRequest::delete(resource_path(&["ideas", id, "unvote"])?))
            .await
            .map_err(|e| e.for_entity("idea", id))?;
        Ok(decode_optional(payload))
    }

    pub async fn delete_idea(&self, id: &str) -> Result<()> {
        self.send_ack(ApiRequest::delete(resource_path(&["ideas", id])?))
            .await
            .map_err(|e| e.for_entity("idea", id))
    }

    // ============================================================================
    // Comments
    // ============================================================================

    pub async fn list_comments(&self, idea_id: &str, page: u32) -> Result<Vec<Comment>> {
        let path = resource_path(&["ideas", idea_id, "comments"])?;
        self.fetch(ApiRequest::get(path).query("page", page))
            .await
            .map_err(|e| e.for_entity("idea", idea_id))
    }

    pub async fn create_comment(&self, idea_id: &str, content: &str) -> Result<Comment> {
        let request = ApiRequest::post(resource_path(&["ideas", idea_id, "comments"])?)
            .json(&json!({ "comment": { "content": content } }))?;
        self.fetch(request)
            .await
            .map_err(|e| e.for_entity("idea", idea_id))
    }

    pub async fn delete_comment(&self, idea_id: &str, comment_id: &str) -> Result<()> {
        let path = resource_path(&["ideas", idea_id, "comments", comment_id])?;
        self.send_ack(ApiRequest::delete(path))
            .await
            .map_err(|e| e.for_entity("comment", comment_id))
    }

    // ============================================================================
    // Roadmap
    // ============================================================================

    pub async fn list_roadmap(&self, page: u32) -> Result<Vec<RoadmapItem>> {
        self.fetch(ApiRequest::get("/roadmap_items").query("page", page))
            .await
    }

    pub async fn get_roadmap_item(&self, id: &str) -> Result<RoadmapItem> {
        self.fetch(ApiRequest::get(resource_path(&["roadmap_items", id])?))
            .await
            .map_err(|e| e.for_entity("roadmap_item", id))
    }

    // ============================================================================
    // Admin
    // ============================================================================

    pub async fn admin_list_ideas(&self, page: u32) -> Result<Vec<Idea>> {
        self.fetch(ApiRequest::get("/admin/ideas").query("page", page))
            .await
    }

    /// Returns the updated idea when the service echoes one.
    pub async fn admin_change_status(&self, id: &str, status: IdeaStatus) -> Result<Option<Idea>> {
        let request = ApiRequest::patch(resource_path(&["admin", "ideas", id, "change_status"])?)
            .json(&json!({ "status": status }))?;
        let payload = self
            .send(request)
            .await
            .map_err(|e| e.for_entity("idea", id))?;
        Ok(decode_optional(payload))
    }

    pub async fn admin_delete_idea(&self, id: &str) -> Result<()> {
        self.send_ack(ApiRequest::delete(resource_path(&["admin", "ideas", id])?))
            .await
            .map_err(|e| e.for_entity("idea", id))
    }

    pub async fn admin_create_roadmap_item(&self, draft: &RoadmapItemDraft) -> Result<RoadmapItem> {
        self.fetch(ApiRequest::post("/admin/roadmap_items").json(&json!({ "roadmap_item": draft }))?)
            .await
    }

    pub async fn admin_update_roadmap_item(
        &self,
        id: &str,
        draft: &RoadmapItemDraft,
    ) -> Result<RoadmapItem> {
        let request = ApiRequest::patch(resource_path(&["admin", "roadmap_items", id])?)
            .json(&json!({ "roadmap_item": draft }))?;
        self.fetch(request)
            .await
            .map_err(|e| e.for_entity("roadmap_item", id))
    }

    pub async fn admin_delete_roadmap_item(&self, id: &str) -> Result<()> {
        self.send_ack(ApiRequest::delete(resource_path(&["admin", "roadmap_items", id])?))
            .await
            .map_err(|e| e.for_entity("roadmap_item", id))
    }
}

/// Strips a `{"data": ...}` envelope when the service wraps its payload.
fn unwrap_envelope(payload: Value) -> Value {
    match payload {
        Value::Object(mut map) if map.len() == 1 && map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn decode<T: DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(unwrap_envelope(payload))
        .map_err(|e| FeedbackError::transport(format!("Malformed response: {}", e)))
}

fn decode_optional<T: DeserializeOwned>(payload: Value) -> Option<T> {
    serde_json::from_value(unwrap_envelope(payload)).ok()
}

fn decode_auth(payload: Value) -> Result<AuthPayload> {
    let auth: AuthPayload = decode(payload)?;
    if auth.token.is_blank() {
        return Err(FeedbackError::transport(
            "Malformed response: missing session token",
        ));
    }
    Ok(auth)
}

/// Joins path segments, percent-encoding each one so an id stays a single
/// segment.
///
/// Empty and dot segments are rejected, since the encoder would drop them.
fn resource_path(segments: &[&str]) -> Result<String> {
    if let Some(bad) = segments
        .iter()
        .find(|segment| matches!(**segment, "" | "." | ".."))
    {
        return Err(FeedbackError::validation(
            "id",
            format!("Invalid identifier '{}'", bad),
        ));
    }
    let mut url = Url::parse(PATH_BASE).map_err(|e| FeedbackError::internal(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| FeedbackError::internal("path base cannot hold segments"))?
        .clear()
        .extend(segments);
    Ok(url.path().to_string())
}
