use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::normalize::format_amount;

/// Public profile of a solver as returned by the matching endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SolverProfile {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, alias = "pricePerJob")]
    pub price_per_job: Option<f64>,
}

/// One ranked entry from `POST /match/solvers`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct MatchedSolver {
    #[serde(rename = "User", alias = "user")]
    pub user: SolverProfile,
    #[serde(rename = "Score", alias = "score", default)]
    pub score: f64,
}

impl MatchedSolver {
    /// Rate label such as `₹450`, or `---` when the solver has no price.
    #[must_use]
    pub fn rate_label(&self, currency: &str) -> String {
        self.user
            .price_per_job
            .filter(|p| p.is_finite() && *p > 0.0)
            .map_or_else(|| "---".to_string(), |p| format!("{currency}{}", format_amount(p)))
    }
}
