//! HTTP implementation of the remote gateway.
//!
//! Wraps a single `reqwest::Client` and normalizes every response into either
//! a JSON payload or a [`FeedbackError`] with a non-empty error list.
//! Exactly one request is issued per call: no retries, no caching.

use async_trait::async_trait;
use featureflow_core::config::ClientConfig;
use featureflow_core::{ApiRequest, FeedbackError, HttpMethod, RemoteGateway, Result};
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Gateway talking JSON over HTTP to the versioned API base.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Creates a gateway for `base_url` (e.g. `http://localhost:3001/api/v1`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FeedbackError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(
            config.base_url(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn request(&self, request: ApiRequest) -> Result<Value> {
        let url = format!("{}{}", self.base_url, request.path);
        let request_id = Uuid::new_v4().to_string();
        let route = request.route();

        let mut builder = self
            .client
            .request(Self::method(request.method), &url)
            .header(ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, &request_id);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder.header(CONTENT_TYPE, "application/json"),
        };

        if let Some(token) = &request.auth_token {
            builder = builder.bearer_auth(token.as_str());
        }

        tracing::debug!(
            request_id = %request_id,
            route = %route,
            authenticated = request.auth_token.is_some(),
            "Dispatching request"
        );

        let response = builder.send().await.map_err(|e| {
            tracing::error!(request_id = %request_id, route = %route, error = %e, "Request failed");
            transport_error(&e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            tracing::error!(request_id = %request_id, route = %route, error = %e, "Failed to read response body");
            transport_error(&e)
        })?;

        if status.is_success() {
            tracing::debug!(request_id = %request_id, route = %route, status = status.as_u16(), "Request succeeded");
            decode_success(&bytes)
        } else {
            let errors = normalize_error_body(&bytes);
            tracing::debug!(
                request_id = %request_id,
                route = %route,
                status = status.as_u16(),
                errors = ?errors,
                "Request rejected"
            );
            Err(FeedbackError::from_status(status.as_u16(), errors))
        }
    }
}

fn transport_error(err: &reqwest::Error) -> FeedbackError {
    if err.is_timeout() {
        FeedbackError::transport("Network error: request timed out")
    } else if err.is_connect() {
        FeedbackError::transport("Network error: could not connect to server")
    } else {
        FeedbackError::transport(format!("Network error: {}", err))
    }
}

/// Decodes a 2xx body. Empty bodies become `null`; non-JSON is malformed.
pub fn decode_success(bytes: &[u8]) -> Result<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes)
        .map_err(|e| FeedbackError::transport(format!("Malformed response: {}", e)))
}

/// Extracts the error list from a non-2xx body.
///
/// Accepts `{"errors": [..]}`, `{"errors": {"full_messages": [..]}}`,
/// `{"errors": {"field": [..]}}` and `{"error": ".."}`. Anything else yields an
/// empty list, which the error classifier replaces with a generic message.
pub fn normalize_error_body(bytes: &[u8]) -> Vec<String> {
    let Ok(body) = serde_json::from_slice::<Value>(bytes) else {
        return Vec::new();
    };

    let mut messages = match body.get("errors") {
        Some(Value::Array(items)) => items.iter().filter_map(message_text).collect(),
        Some(Value::Object(fields)) => {
            if let Some(Value::Array(full)) = fields.get("full_messages") {
                full.iter().filter_map(message_text).collect()
            } else {
                fields
                    .iter()
                    .flat_map(|(field, value)| field_messages(field, value))
                    .collect()
            }
        }
        Some(Value::String(text)) => vec![text.clone()],
        _ => Vec::new(),
    };

    if messages.is_empty()
        && let Some(text) = body.get("error").and_then(message_text)
    {
        messages.push(text);
    }

    messages.retain(|m| !m.trim().is_empty());
    messages
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn field_messages(field: &str, value: &Value) -> Vec<String> {
    let describe = |text: String| format!("{} {}", humanize(field), text);
    match value {
        Value::Array(items) => items.iter().filter_map(message_text).map(describe).collect(),
        other => message_text(other).map(describe).into_iter().collect(),
    }
}

fn humanize(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use featureflow_core::AuthToken;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves one canned HTTP response and returns the raw request it received.
    async fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let raw = read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            raw
        });

        (format!("http://{}/api/v1", addr), handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let lower = line.to_ascii_lowercase();
                        lower
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn gateway(base_url: &str) -> HttpGateway {
        HttpGateway::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_normalize_error_shapes() {
        assert_eq!(
            normalize_error_body(br#"{"errors": ["Invalid login credentials. Please try again."]}"#),
            vec!["Invalid login credentials. Please try again.".to_string()]
        );
        assert_eq!(
            normalize_error_body(br#"{"error": "Not authorized"}"#),
            vec!["Not authorized".to_string()]
        );
        assert_eq!(
            normalize_error_body(br#"{"errors": {"full_messages": ["Email has already been taken"]}}"#),
            vec!["Email has already been taken".to_string()]
        );
        assert_eq!(
            normalize_error_body(br#"{"errors": {"title": ["is too short"]}}"#),
            vec!["Title is too short".to_string()]
        );
        assert!(normalize_error_body(b"<html>502</html>").is_empty());
        assert!(normalize_error_body(b"").is_empty());
    }

    #[test]
    fn test_decode_success() {
        assert_eq!(decode_success(b"").unwrap(), Value::Null);
        assert_eq!(decode_success(b" \n").unwrap(), Value::Null);
        assert_eq!(decode_success(br#"{"ok": true}"#).unwrap(), json!({"ok": true}));
        assert!(decode_success(b"not json").unwrap_err().is_transport());
    }

    #[tokio::test]
    async fn test_success_attaches_bearer_and_query() {
        let (base_url, server) = serve_once("200 OK", r#"[{"id": 1}]"#).await;

        let payload = gateway(&base_url)
            .request(
                ApiRequest::get("/ideas/trending")
                    .query("page", 2)
                    .bearer(Some(AuthToken::new("tok-abc"))),
            )
            .await
            .unwrap();

        assert_eq!(payload, json!([{"id": 1}]));
        let raw = server.await.unwrap();
        assert!(raw.starts_with("GET /api/v1/ideas/trending?page=2 "));
        assert!(raw.to_ascii_lowercase().contains("authorization: bearer tok-abc"));
    }

    #[tokio::test]
    async fn test_anonymous_request_omits_authorization() {
        let (base_url, server) = serve_once("200 OK", "[]").await;

        gateway(&base_url)
            .request(ApiRequest::get("/roadmap_items"))
            .await
            .unwrap();

        let raw = server.await.unwrap();
        assert!(!raw.to_ascii_lowercase().contains("authorization:"));
    }

    #[tokio::test]
    async fn test_json_body_is_sent() {
        let (base_url, server) = serve_once("201 Created", r#"{"id": 9}"#).await;

        gateway(&base_url)
            .request(
                ApiRequest::post("/ideas/1/comments")
                    .json(&json!({"comment": {"content": "+1"}}))
                    .unwrap(),
            )
            .await
            .unwrap();

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /api/v1/ideas/1/comments "));
        assert!(raw.ends_with(r#"{"comment":{"content":"+1"}}"#));
    }

    #[tokio::test]
    async fn test_unauthorized_maps_error_list() {
        let (base_url, _server) =
            serve_once("401 Unauthorized", r#"{"errors": ["Invalid login credentials"]}"#).await;

        let err = gateway(&base_url)
            .request(ApiRequest::post("/auth/sign_in"))
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(err.messages(), vec!["Invalid login credentials".to_string()]);
    }

    #[tokio::test]
    async fn test_server_error_without_body_is_generic() {
        let (base_url, _server) = serve_once("500 Internal Server Error", "").await;

        let err = gateway(&base_url)
            .request(ApiRequest::get("/ideas"))
            .await
            .unwrap_err();

        assert!(matches!(err, FeedbackError::Server { status: 500, .. }));
        assert_eq!(err.user_message(), featureflow_core::error::GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_empty_body_is_null() {
        let (base_url, _server) = serve_once("200 OK", "").await;

        let payload = gateway(&base_url)
            .request(ApiRequest::delete("/ideas/1/comments/2"))
            .await
            .unwrap();

        assert_eq!(payload, Value::Null);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = gateway(&format!("http://{}/api/v1", addr))
            .request(ApiRequest::get("/ideas"))
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert_eq!(err.messages().len(), 1);
    }
}
