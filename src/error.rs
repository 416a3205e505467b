//! Error types for requests and persisted storage.
//!
//! ERROR HANDLING
//! ==============
//! Request failures are returned to callers as [`ApiError`]; the session
//! store turns login failures into a readable message instead. Storage
//! failures are logged and never abort a session transition.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use std::time::Duration;

/// Errors produced while issuing a request through the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (offline, DNS, TLS, CORS).
    #[error("network request failed: {0}")]
    Network(String),

    /// No response arrived within the configured timeout.
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The server answered with a non-success status.
    #[error("request failed with status {status}")]
    Status {
        status: u16,
        /// Human-readable message extracted from the response body.
        detail: Option<String>,
    },

    /// The response body could not be deserialized.
    #[error("response parse failed: {0}")]
    Decode(String),

    /// The request body could not be serialized.
    #[error("request encode failed: {0}")]
    Encode(String),
}

/// Coarse classification used for recovery decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Credentials or form input rejected by the server.
    InvalidCredentials,
    /// Offline, timed out, or an unreadable response.
    NetworkFailure,
    /// The bearer token is no longer accepted (401).
    SessionExpired,
    /// Authenticated but not allowed (403).
    Forbidden,
    /// Any other server status (404, 5xx, ...).
    Server,
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::Decode(_) | Self::Encode(_) => FailureKind::NetworkFailure,
            Self::Status { status: 401, .. } => FailureKind::SessionExpired,
            Self::Status { status: 403, .. } => FailureKind::Forbidden,
            Self::Status { status: 400 | 422, .. } => FailureKind::InvalidCredentials,
            Self::Status { .. } => FailureKind::Server,
        }
    }

    /// Server-provided message, if the failure payload carried one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Errors produced by a [`crate::storage::KeyValueStore`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No storage backend is reachable (no window, private mode).
    #[error("storage unavailable")]
    Unavailable,

    /// The backend rejected the write (quota, permissions).
    #[error("storage write failed: {0}")]
    Write(String),

    /// File-backed storage I/O failure.
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Why a login attempt did not produce a session.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The session could not be written through to storage.
    #[error("failed to persist session: {0}")]
    Storage(#[from] StorageError),
}

impl LoginError {
    /// Server-provided message, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Api(err) => err.detail(),
            Self::Storage(_) => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(err) if err.is_unauthorized())
    }
}
