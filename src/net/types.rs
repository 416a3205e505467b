//! Wire DTOs for the diary auth endpoints.
//!
//! DESIGN
//! ======
//! Deserialization is lenient: optional profile fields default, unknown roles
//! map to [`Role::Unknown`], so a server-side schema addition never turns a
//! valid login into a failure.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Fallback shown when a profile carries neither a full name nor a username.
pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// Account role as issued by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
    #[serde(other)]
    Unknown,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated user as returned by `GET /auth/me`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub teacher_id: Option<i64>,
    #[serde(default)]
    pub student_id: Option<i64>,
    #[serde(default)]
    pub password_change_required: bool,
}

fn default_true() -> bool {
    true
}

impl Profile {
    /// Full name, else username, else [`DEFAULT_DISPLAY_NAME`].
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| Some(self.username.as_str()).filter(|n| !n.is_empty()))
            .unwrap_or(DEFAULT_DISPLAY_NAME)
    }
}

/// Response of `POST /auth/token`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub password_change_required: bool,
}

/// Form fields of the OAuth2 password grant.
#[derive(Clone, Debug, Serialize)]
pub struct PasswordGrant<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Body of `POST /auth/change_password`.
#[derive(Clone, Debug, Serialize)]
pub struct PasswordChange<'a> {
    pub old_password: &'a str,
    pub new_password: &'a str,
}

/// Body of `POST /auth/signup`. New accounts stay inactive until approved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
}

/// Acknowledgement body returned by mutation endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct OkResponse {
    #[serde(default)]
    pub ok: bool,
}

/// Error payload in the backend's `{"detail": ...}` shape.
///
/// `detail` is a string for handled errors and a list of
/// `{loc, msg, type}` objects for request validation failures.
#[derive(Clone, Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Extract a human-readable message from an error response body.
#[must_use]
pub fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let message = match parsed.detail {
        serde_json::Value::String(s) => s,
        serde_json::Value::Array(items) => items
            .iter()
            .find_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
            .map(str::to_owned)?,
        _ => return None,
    };
    let message = message.trim();
    (!message.is_empty()).then(|| message.to_owned())
}
