use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::deadline_to_instant;

pub const DEFAULT_URGENCY: &str = "Medium";
pub const DEFAULT_ASSIGNMENT_TITLE: &str = "Untitled Assignment";
pub const OPEN_STATUS: &str = "open";

/// A latitude/longitude fix.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// The fields a confirmation reads from the brief state, already resolved
/// between the latest parse result and the display fallback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionSource {
    pub topic: Option<String>,
    pub estimated_price: f64,
    pub deadline: Option<String>,
    pub skills: Vec<String>,
    pub urgency: Option<String>,
    pub pages: Option<u32>,
    /// Normalized parse result forwarded as `raw_entities` (`{}` when absent).
    pub raw_entities: Value,
}

/// Body of `POST /assignment/create`.
///
/// Built once by [`SubmissionPayload::build`]; there is no mutating API.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    title: String,
    description: String,
    pages: u32,
    urgency: String,
    location: GeoPoint,
    price: f64,
    status: String,
    created_at: DateTime<Utc>,
    lat: f64,
    lng: f64,
    skills: Vec<String>,
    deadline: Option<String>,
    bid_amount: f64,
    #[serde(rename = "raw_entities")]
    raw_entities: Value,
}

impl SubmissionPayload {
    /// Assemble the payload for one confirmation.
    ///
    /// `fallback_title` is the brief title, used when the source names no topic.
    /// The price is clamped to `>= 0` and the deadline is re-normalized to an
    /// RFC 3339 instant (bare dates become midnight UTC).
    #[must_use]
    pub fn build(
        user_id: Option<&str>,
        source: SubmissionSource,
        fallback_title: &str,
        location: GeoPoint,
        created_at: DateTime<Utc>,
    ) -> Self {
        let title = source
            .topic
            .filter(|t| !t.trim().is_empty())
            .or_else(|| Some(fallback_title.to_string()).filter(|t| !t.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_ASSIGNMENT_TITLE.to_string());
        let price = if source.estimated_price.is_finite() {
            source.estimated_price.max(0.0)
        } else {
            0.0
        };

        Self {
            user_id: user_id.map(str::to_string),
            description: format!("Confirmed brief: {title}"),
            title,
            pages: source.pages.unwrap_or(0),
            urgency: source
                .urgency
                .unwrap_or_else(|| DEFAULT_URGENCY.to_string()),
            location,
            price,
            status: OPEN_STATUS.to_string(),
            created_at,
            lat: location.latitude,
            lng: location.longitude,
            skills: source.skills,
            deadline: source.deadline.as_deref().and_then(deadline_to_instant),
            bid_amount: 0.0,
            raw_entities: source.raw_entities,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn urgency(&self) -> &str {
        &self.urgency
    }

    #[must_use]
    pub const fn price(&self) -> f64 {
        self.price
    }

    #[must_use]
    pub const fn location(&self) -> GeoPoint {
        self.location
    }

    #[must_use]
    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    #[must_use]
    pub fn deadline(&self) -> Option<&str> {
        self.deadline.as_deref()
    }

    #[must_use]
    pub const fn raw_entities(&self) -> &Value {
        &self.raw_entities
    }
}

/// Body of a successful `POST /assignment/create`.
///
/// The backend may or may not echo the new id back.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CreatedAssignment {
    #[serde(default, alias = "_id", alias = "insertedId")]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn source() -> SubmissionSource {
        SubmissionSource {
            topic: Some("Landing page".into()),
            estimated_price: 250.0,
            deadline: Some("2025-11-24".into()),
            skills: vec!["Next.js".into()],
            urgency: None,
            pages: None,
            raw_entities: json!({}),
        }
    }

    #[test]
    fn build_fills_defaults_and_mirrors_location() {
        let payload = SubmissionPayload::build(
            Some("u1"),
            source(),
            "ignored",
            GeoPoint::new(12.97, 77.59),
            Utc::now(),
        );
        assert_eq!(payload.title(), "Landing page");
        assert_eq!(payload.description(), "Confirmed brief: Landing page");
        assert_eq!(payload.urgency(), DEFAULT_URGENCY);
        assert_eq!(payload.deadline(), Some("2025-11-24T00:00:00Z"));

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["userId"], "u1");
        assert_eq!(value["lat"], 12.97);
        assert_eq!(value["lng"], 77.59);
        assert_eq!(value["location"]["latitude"], 12.97);
        assert_eq!(value["status"], "open");
        assert_eq!(value["bidAmount"], 0.0);
        assert_eq!(value["pages"], 0);
        assert!(value.get("raw_entities").is_some());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn negative_price_is_clamped() {
        let payload = SubmissionPayload::build(
            None,
            SubmissionSource {
                estimated_price: -10.0,
                ..source()
            },
            "x",
            GeoPoint::new(0.0, 0.0),
            Utc::now(),
        );
        assert!(payload.price().abs() < f64::EPSILON);
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("userId").is_none());
    }

    #[test]
    fn title_falls_back_to_brief_then_default() {
        let no_topic = SubmissionSource {
            topic: None,
            ..source()
        };
        let payload =
            SubmissionPayload::build(None, no_topic.clone(), "Brief title", GeoPoint::new(0.0, 0.0), Utc::now());
        assert_eq!(payload.title(), "Brief title");

        let payload = SubmissionPayload::build(None, no_topic, "", GeoPoint::new(0.0, 0.0), Utc::now());
        assert_eq!(payload.title(), DEFAULT_ASSIGNMENT_TITLE);
    }

    #[test]
    fn unparseable_deadline_is_null() {
        let payload = SubmissionPayload::build(
            None,
            SubmissionSource {
                deadline: Some("whenever".into()),
                ..source()
            },
            "x",
            GeoPoint::new(0.0, 0.0),
            Utc::now(),
        );
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value["deadline"].is_null());
    }
}
