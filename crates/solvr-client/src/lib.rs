//! # solvr-client
//!
//! HTTP client for the task marketplace backend.
//!
//! Endpoints (relative to the configured base URL):
//! - `POST /nlp/parse`
//! - `POST /assignment/create`
//! - `POST /match/solvers`
//! - `POST /auth/login`, `POST /auth/register`
//! - `POST /users/{id}/location`

mod api;
mod error;
mod http;
pub mod types;

pub use api::MarketplaceApi;
pub use error::ClientError;
pub use types::{AuthResponse, LoginRequest, ParseResponse, RegisterRequest};

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use solvr_config::BackendConfig;
use solvr_core::entities::{CreatedAssignment, GeoPoint, MatchedSolver, SubmissionPayload};

use crate::http::{check_response, decode_body, decode_json};
use crate::types::{MatchRequest, ParseRequest};

/// Read the creation response, which may carry the id at the top level or
/// under `data`.
fn created_assignment(value: &Value) -> CreatedAssignment {
    let mut created: CreatedAssignment =
        serde_json::from_value(value.clone()).unwrap_or_default();
    if created.id.is_none() {
        created.id = value
            .get("data")
            .and_then(|data| data.get("id").or_else(|| data.get("_id")))
            .and_then(Value::as_str)
            .map(str::to_string);
    }
    created
}

const USER_AGENT: &str = concat!("solvr/", env!("CARGO_PKG_VERSION"));

/// reqwest-backed [`MarketplaceApi`].
#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    http: reqwest::Client,
    base_url: String,
}

impl MarketplaceClient {
    /// Build a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the TLS backend cannot be initialized.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn from_config(config: &BackendConfig) -> Result<Self, ClientError> {
        Self::new(config.base_url(), Duration::from_secs(config.timeout_secs))
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, ClientError> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let resp = self.http.post(&url).json(body).send().await?;
        check_response(resp).await
    }
}

#[async_trait]
impl MarketplaceApi for MarketplaceClient {
    async fn parse_text(
        &self,
        text: &str,
        user_id: Option<&str>,
    ) -> Result<ParseResponse, ClientError> {
        let resp = self
            .post("/nlp/parse", &ParseRequest { text, user_id })
            .await?;
        decode_json(resp).await
    }

    async fn create_assignment(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<CreatedAssignment, ClientError> {
        let resp = self.post("/assignment/create", payload).await?;
        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(CreatedAssignment::default());
        }
        // A 2xx with an unexpected body still means the assignment was stored.
        match decode_body::<Value>(&body) {
            Ok(value) => Ok(created_assignment(&value)),
            Err(e) => {
                tracing::warn!(%e, "unrecognized assignment creation response");
                Ok(CreatedAssignment::default())
            }
        }
    }

    async fn match_solvers(
        &self,
        description: &str,
        location: GeoPoint,
    ) -> Result<Vec<MatchedSolver>, ClientError> {
        let resp = self
            .post(
                "/match/solvers",
                &MatchRequest {
                    description,
                    location,
                },
            )
            .await?;
        let solvers: Option<Vec<MatchedSolver>> = decode_json(resp).await?;
        Ok(solvers.unwrap_or_default())
    }

    async fn login(&self, request: &LoginRequest<'_>) -> Result<AuthResponse, ClientError> {
        let resp = self.post("/auth/login", request).await?;
        decode_json(resp).await
    }

    async fn register(&self, request: &RegisterRequest<'_>) -> Result<AuthResponse, ClientError> {
        let resp = self.post("/auth/register", request).await?;
        decode_json(resp).await
    }

    async fn share_location(&self, user_id: &str, location: GeoPoint) -> Result<(), ClientError> {
        let path = format!("/users/{}/location", urlencoding::encode(user_id));
        self.post(&path, &location).await?;
        Ok(())
    }
}
