//! Error types for the Feature Flow client.

use crate::session::AuthToken;
use thiserror::Error;

/// Fallback message when the remote service reports a failure without a body.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// A shared error type for the entire Feature Flow client.
///
/// Variants follow the failure taxonomy of the client: local validation,
/// authorization, missing entities, transport failures and server-reported
/// errors. Every variant can be flattened into a non-empty list of
/// user-facing messages via [`FeedbackError::messages`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedbackError {
    /// Input rejected locally before any request was made
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    /// Operation requires a signed-in viewer
    #[error("{0}")]
    NotAuthenticated(String),

    /// Token missing, expired or rejected by the remote service (HTTP 401).
    ///
    /// `rejected` is the bearer token the failed request carried, if any.
    #[error("Unauthorized: {}", .errors.join(", "))]
    Unauthorized {
        errors: Vec<String>,
        rejected: Option<AuthToken>,
    },

    /// Viewer lacks the role for this operation (local check or HTTP 403)
    #[error("Forbidden: {}", .errors.join(", "))]
    Forbidden { errors: Vec<String> },

    /// Entity not found with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Network, timeout or malformed-response failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-2xx response that is not otherwise classified
    #[error("Server error ({status}): {}", .errors.join(", "))]
    Server { status: u16, errors: Vec<String> },

    /// A mutation on the same target is still in flight
    #[error("Busy: {key} is already in progress")]
    Busy { key: String },

    /// Destructive operation dispatched without explicit confirmation
    #[error("Confirmation required: {0}")]
    ConfirmationRequired(String),

    /// Local persistence error (token file)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FeedbackError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error for the given field
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Creates the "please sign in" rejection used by every viewer-gated operation
    pub fn sign_in_required(action: &str) -> Self {
        Self::NotAuthenticated(format!("Please sign in to {}", action))
    }

    /// Creates a locally-raised Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            errors: vec![message.into()],
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Busy error for an in-flight key
    pub fn busy(key: impl Into<String>) -> Self {
        Self::Busy { key: key.into() }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Classifies a non-2xx HTTP status and its normalized error list.
    ///
    /// An empty list is replaced with [`GENERIC_ERROR_MESSAGE`] so the result
    /// always carries at least one message.
    pub fn from_status(status: u16, errors: Vec<String>) -> Self {
        let errors = if errors.is_empty() {
            vec![GENERIC_ERROR_MESSAGE.to_string()]
        } else {
            errors
        };

        match status {
            401 => Self::Unauthorized {
                errors,
                rejected: None,
            },
            403 => Self::Forbidden { errors },
            404 => Self::NotFound {
                entity_type: "resource",
                id: errors.join(", "),
            },
            _ => Self::Server { status, errors },
        }
    }

    /// Attributes a remote not-found to the entity the request targeted.
    pub fn for_entity(self, entity_type: &'static str, id: impl Into<String>) -> Self {
        match self {
            Self::NotFound { .. } => Self::not_found(entity_type, id),
            other => other,
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a local validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if the token was rejected and the session must be dropped
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Records the bearer token a rejected request carried.
    ///
    /// Leaves every other variant untouched.
    pub fn with_rejected_token(self, token: Option<AuthToken>) -> Self {
        match self {
            Self::Unauthorized { errors, .. } => Self::Unauthorized {
                errors,
                rejected: token,
            },
            other => other,
        }
    }

    /// Token the service rejected with a 401, when the request carried one
    pub fn rejected_token(&self) -> Option<&AuthToken> {
        match self {
            Self::Unauthorized { rejected, .. } => rejected.as_ref(),
            _ => None,
        }
    }

    /// Check if this is any authorization failure (sign-in, 401 or 403)
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotAuthenticated(_) | Self::Unauthorized { .. } | Self::Forbidden { .. }
        )
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a transport-level failure
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this is a busy-guard rejection
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }

    // ============================================================================
    // User-facing rendering
    // ============================================================================

    /// Returns the normalized, non-empty error list.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Unauthorized { errors, .. } | Self::Forbidden { errors } | Self::Server { errors, .. }
                if !errors.is_empty() =>
            {
                errors.clone()
            }
            Self::Validation { message, .. } => vec![message.clone()],
            Self::NotAuthenticated(message) => vec![message.clone()],
            Self::Transport(message) => vec![message.clone()],
            other => vec![other.to_string()],
        }
    }

    /// Returns the single line shown in a transient notification.
    pub fn user_message(&self) -> String {
        self.messages()
            .into_iter()
            .next()
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for FeedbackError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for FeedbackError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for FeedbackError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for FeedbackError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, FeedbackError>`.
pub type Result<T> = std::result::Result<T, FeedbackError>;
