use chrono::{FixedOffset, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::{
    DATE_FORMAT, deadline_or_flexible, format_amount, price_from_value, skills_from_value,
};

/// Title of a brief that has not been populated yet. Gates confirmation.
pub const PENDING_TITLE: &str = "Pending...";
/// Title used when the last input carried no usable project description.
pub const IRRELEVANT_TITLE: &str = "Irrelevant Input";
/// Title used when a parse succeeded but named no topic or type.
pub const UNTITLED_TITLE: &str = "Untitled Project";
pub const FLEXIBLE_LABEL: &str = "Flexible";
pub const NEGOTIABLE_LABEL: &str = "Negotiable";
pub const DEFAULT_CURRENCY: &str = "₹";

/// The structured summary of a requester's project intent.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Brief {
    pub title: String,
    pub estimated_budget: Option<f64>,
    pub deadline: Option<NaiveDate>,
    /// `"HH"` of the deadline in the display offset.
    pub deadline_hour: Option<String>,
    /// Unique, first-seen ordered.
    pub required_skills: Vec<String>,
    /// Raw backend fields the brief was derived from, passed through untouched.
    #[serde(default)]
    pub raw_fields: Value,
}

impl Brief {
    /// The "not yet populated" brief every session starts with.
    #[must_use]
    pub fn pending() -> Self {
        Self::titled(PENDING_TITLE)
    }

    /// The explicit "no usable input" brief.
    #[must_use]
    pub fn irrelevant() -> Self {
        Self::titled(IRRELEVANT_TITLE)
    }

    fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            estimated_budget: None,
            deadline: None,
            deadline_hour: None,
            required_skills: Vec::new(),
            raw_fields: Value::Null,
        }
    }

    /// Build a brief from one parse result. Nothing from earlier briefs survives.
    #[must_use]
    pub fn from_parsed(parsed: &ParsedBrief) -> Self {
        Self {
            title: parsed.display_title(),
            estimated_budget: parsed.estimated_price,
            deadline: parsed.deadline,
            deadline_hour: parsed.deadline_hour.clone(),
            required_skills: parsed.skills_required.clone(),
            raw_fields: parsed.raw.clone(),
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.title == PENDING_TITLE
    }

    /// Pure projection for rendering.
    #[must_use]
    pub fn to_display(&self, currency: &str) -> BriefDisplay {
        BriefDisplay {
            title: self.title.clone(),
            budget_label: self.estimated_budget.map_or_else(
                || NEGOTIABLE_LABEL.to_string(),
                |amount| format!("{currency}{}", format_amount(amount)),
            ),
            deadline_label: self.deadline.map_or_else(
                || FLEXIBLE_LABEL.to_string(),
                |date| date.format(DATE_FORMAT).to_string(),
            ),
            skills: self.required_skills.clone(),
        }
    }
}

impl Default for Brief {
    fn default() -> Self {
        Self::pending()
    }
}

/// Display-ready strings for a brief panel.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BriefDisplay {
    pub title: String,
    pub budget_label: String,
    pub deadline_label: String,
    pub skills: Vec<String>,
}

/// Normalized result of one NLP parse.
///
/// Serialized with the backend's field names because it is forwarded verbatim
/// as `raw_entities` in the assignment payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ParsedBrief {
    pub topic: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub domain: Option<String>,
    pub urgency: Option<String>,
    pub estimated_price: Option<f64>,
    #[serde(default)]
    pub skills_required: Vec<String>,
    pub raw_deadline: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub deadline_hour: Option<String>,
    pub pages: Option<u32>,
    /// Explanation the backend attaches when it could not use the input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip)]
    pub raw: Value,
}

impl ParsedBrief {
    /// Normalize the `data` object of an NLP parse response.
    ///
    /// Field fallbacks: `topic` ← `topic` | `title` | `type`, `urgency` ←
    /// `urgency` | `priority`, `estimated_price` ← `estimated_price` | `price`.
    /// Blank strings count as absent.
    #[must_use]
    pub fn from_raw(raw: &Value, offset: FixedOffset) -> Self {
        let text = |key: &str| {
            raw.get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let raw_deadline = text("deadline");
        let deadline = deadline_or_flexible(raw_deadline.as_deref(), offset);

        Self {
            topic: text("topic").or_else(|| text("title")).or_else(|| text("type")),
            kind: text("type"),
            domain: text("domain"),
            urgency: text("urgency").or_else(|| text("priority")),
            estimated_price: raw
                .get("estimated_price")
                .and_then(price_from_value)
                .or_else(|| raw.get("price").and_then(price_from_value)),
            skills_required: raw
                .get("skills_required")
                .map(skills_from_value)
                .unwrap_or_default(),
            raw_deadline,
            deadline: deadline.as_ref().map(|d| d.date),
            deadline_hour: deadline.and_then(|d| d.hour),
            pages: raw
                .get("pages")
                .and_then(Value::as_u64)
                .and_then(|p| u32::try_from(p).ok()),
            message: text("message"),
            raw: raw.clone(),
        }
    }

    /// `type == "Irrelevant"` or a non-empty backend message means the input
    /// carried no usable brief.
    #[must_use]
    pub fn is_irrelevant(&self) -> bool {
        self.kind.as_deref() == Some("Irrelevant") || self.message.is_some()
    }

    #[must_use]
    pub fn display_title(&self) -> String {
        self.topic
            .clone()
            .or_else(|| self.kind.clone())
            .unwrap_or_else(|| UNTITLED_TITLE.to_string())
    }
}
