//! Versioned, replace-only brief state.
//!
//! A session holds exactly one current [`Brief`]. The only ways to change it
//! are wholesale: [`BriefState::apply_parsed`], [`BriefState::mark_irrelevant`],
//! and [`BriefState::reset`]. There is no field-level setter, so fields from
//! two different parse results can never be merged. Every replacement bumps
//! [`BriefState::version`].

use serde::Serialize;
use serde_json::Value;

use crate::entities::{
    Brief, BriefDisplay, FLEXIBLE_LABEL, PENDING_TITLE, ParsedBrief, SubmissionSource,
};
use crate::normalize::{DATE_FORMAT, parse_price_lenient};

#[derive(Debug, Clone, Serialize)]
pub struct BriefState {
    brief: Brief,
    parsed: Option<ParsedBrief>,
    version: u64,
}

impl BriefState {
    /// Fresh state holding the sentinel brief at version 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            brief: Brief::pending(),
            parsed: None,
            version: 0,
        }
    }

    #[must_use]
    pub const fn brief(&self) -> &Brief {
        &self.brief
    }

    /// The structured parse result behind the current brief, if any.
    #[must_use]
    pub const fn parsed(&self) -> Option<&ParsedBrief> {
        self.parsed.as_ref()
    }

    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.brief.is_pending()
    }

    /// Replace the brief with one derived from `parsed`. Returns the new version.
    pub fn apply_parsed(&mut self, parsed: ParsedBrief) -> u64 {
        let brief = Brief::from_parsed(&parsed);
        self.replace(brief, Some(parsed))
    }

    /// Replace the brief with the explicit "no usable input" state.
    pub fn mark_irrelevant(&mut self) -> u64 {
        self.replace(Brief::irrelevant(), None)
    }

    /// Return to the sentinel brief.
    pub fn reset(&mut self) -> u64 {
        self.replace(Brief::pending(), None)
    }

    fn replace(&mut self, brief: Brief, parsed: Option<ParsedBrief>) -> u64 {
        self.brief = brief;
        self.parsed = parsed;
        self.version += 1;
        tracing::debug!(version = self.version, title = %self.brief.title, "brief replaced");
        self.version
    }

    #[must_use]
    pub fn to_display(&self, currency: &str) -> BriefDisplay {
        self.brief.to_display(currency)
    }

    /// Resolve what a confirmation should submit.
    ///
    /// Prefers the latest structured parse result. Without one, falls back to
    /// the display fields: the budget label is coerced leniently (non-numeric
    /// becomes `0`) and the deadline label is used only when it is a real date.
    #[must_use]
    pub fn submission_source(&self, currency: &str) -> SubmissionSource {
        if let Some(parsed) = &self.parsed {
            return SubmissionSource {
                topic: Some(parsed.display_title()),
                estimated_price: parsed.estimated_price.unwrap_or(0.0),
                deadline: parsed
                    .deadline
                    .map(|d| d.format(DATE_FORMAT).to_string())
                    .or_else(|| parsed.raw_deadline.clone()),
                skills: parsed.skills_required.clone(),
                urgency: parsed.urgency.clone(),
                pages: parsed.pages,
                raw_entities: serde_json::to_value(parsed).unwrap_or(Value::Null),
            };
        }

        let display = self.brief.to_display(currency);
        SubmissionSource::from_display(&display)
    }
}

impl Default for BriefState {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionSource {
    /// Fallback source built from display strings only.
    #[must_use]
    pub fn from_display(display: &BriefDisplay) -> Self {
        let deadline = Some(display.deadline_label.as_str())
            .filter(|label| ![FLEXIBLE_LABEL, "-", PENDING_TITLE].contains(label))
            .map(str::to_string);
        Self {
            topic: Some(display.title.clone()),
            estimated_price: parse_price_lenient(&display.budget_label),
            deadline,
            skills: display.skills.clone(),
            urgency: None,
            pages: None,
            raw_entities: Value::Object(serde_json::Map::new()),
        }
    }
}
