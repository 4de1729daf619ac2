//! The marketplace operations used by the session workflows.

use async_trait::async_trait;
use solvr_core::entities::{CreatedAssignment, GeoPoint, MatchedSolver, SubmissionPayload};

use crate::error::ClientError;
use crate::types::{AuthResponse, LoginRequest, ParseResponse, RegisterRequest};

/// Backend operations. [`MarketplaceClient`](crate::MarketplaceClient) is the
/// HTTP implementation; tests substitute in-memory fakes.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// Run free text through the NLP parser.
    async fn parse_text(
        &self,
        text: &str,
        user_id: Option<&str>,
    ) -> Result<ParseResponse, ClientError>;

    /// Create an assignment from a confirmed brief.
    async fn create_assignment(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<CreatedAssignment, ClientError>;

    /// Ranked solvers for a description, in backend order.
    async fn match_solvers(
        &self,
        description: &str,
        location: GeoPoint,
    ) -> Result<Vec<MatchedSolver>, ClientError>;

    async fn login(&self, request: &LoginRequest<'_>) -> Result<AuthResponse, ClientError>;

    async fn register(&self, request: &RegisterRequest<'_>) -> Result<AuthResponse, ClientError>;

    /// Record a user's current position.
    async fn share_location(&self, user_id: &str, location: GeoPoint) -> Result<(), ClientError>;
}
