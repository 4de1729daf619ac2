//! Request and response bodies for the marketplace endpoints.
//!
//! Field names follow the backend's JSON, which mixes camelCase and
//! snake_case between endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use solvr_core::entities::GeoPoint;
use solvr_core::enums::UserRole;

/// `POST /nlp/parse` request.
#[derive(Debug, Clone, Serialize)]
pub struct ParseRequest<'a> {
    pub text: &'a str,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<&'a str>,
}

/// `POST /nlp/parse` response envelope.
///
/// `data` is left as raw JSON; normalization happens in `solvr-core`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ParseResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
}

/// `POST /match/solvers` request.
#[derive(Debug, Clone, Serialize)]
pub struct MatchRequest<'a> {
    pub description: &'a str,
    pub location: GeoPoint,
}

/// `POST /auth/login` request.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub role: UserRole,
}

/// `POST /auth/register` request.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub role: UserRole,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
}

/// Response to login and registration.
///
/// The user id may come back at the top level or nested under `user`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

impl AuthResponse {
    /// The acting user's id, preferring the top-level field.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or_else(|| self.user.as_ref().and_then(|u| u.id.as_deref()))
            .filter(|id| !id.trim().is_empty())
    }
}
