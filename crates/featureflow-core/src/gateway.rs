//! Remote gateway contract.
//!
//! A gateway performs exactly one request per call and normalizes the
//! outcome: a JSON payload on success, a [`FeedbackError`] carrying a
//! non-empty error list otherwise. Implementations must not retry or cache.
//!
//! [`FeedbackError`]: crate::error::FeedbackError

use crate::error::Result;
use crate::session::AuthToken;
use serde::Serialize;
use serde_json::Value;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

/// A single request against the versioned API base path.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path relative to the API base, starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Attached as a bearer credential when present.
    pub auth_token: Option<AuthToken>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            auth_token: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Sets a JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn bearer(mut self, token: Option<AuthToken>) -> Self {
        self.auth_token = token;
        self
    }

    /// `METHOD /path` label for logs and busy-guard keys.
    pub fn route(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// Transport abstraction over the remote service.
#[async_trait::async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Issues the request once and returns the decoded payload.
    ///
    /// Empty success bodies decode to `Value::Null`.
    async fn request(&self, request: ApiRequest) -> Result<Value>;
}
