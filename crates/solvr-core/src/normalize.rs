//! Normalization of loosely-typed backend fields.
//!
//! The NLP backend returns deadlines, skills, and prices in several shapes.
//! Everything here is total: bad input degrades to `None`, an empty list, or
//! `0` instead of failing the chat flow. Only [`proposal_amount`] rejects
//! input, because a proposal price is typed by the user and must be valid.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Timelike, Utc};
use serde_json::Value;

use crate::errors::CoreError;

/// Calendar date format used in briefs and payloads.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp layouts accepted when the backend omits the offset. Read as UTC.
const NAIVE_LAYOUTS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

// ── Deadlines ──────────────────────────────────────────────────────

/// A deadline split into its calendar date and hour-of-day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDeadline {
    /// Date component (UTC calendar date of the instant).
    pub date: NaiveDate,
    /// `"HH"`, 24-hour and zero-padded, in the display offset. `None` for bare dates.
    pub hour: Option<String>,
}

/// Parse a bare `YYYY-MM-DD` date.
#[must_use]
pub fn parse_bare_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// Parse an instant. RFC 3339 first, then offset-less layouts as UTC.
///
/// # Errors
///
/// Returns [`CoreError::ParseFailure`] if no layout matches.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, CoreError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| CoreError::ParseFailure(format!("not a valid instant: {raw:?}")))
}

/// Split a backend deadline into date and hour.
///
/// # Errors
///
/// Returns [`CoreError::ParseFailure`] for anything that is neither a bare date
/// nor a parseable instant. Callers absorb it into "Flexible".
pub fn normalize_deadline(raw: &str, offset: FixedOffset) -> Result<NormalizedDeadline, CoreError> {
    if let Some(date) = parse_bare_date(raw) {
        return Ok(NormalizedDeadline { date, hour: None });
    }
    let instant = parse_instant(raw)?;
    let local_hour = instant.with_timezone(&offset).hour();
    Ok(NormalizedDeadline {
        date: instant.date_naive(),
        hour: Some(format!("{local_hour:02}")),
    })
}

/// Lenient wrapper around [`normalize_deadline`] for optional input.
#[must_use]
pub fn deadline_or_flexible(raw: Option<&str>, offset: FixedOffset) -> Option<NormalizedDeadline> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match normalize_deadline(raw, offset) {
        Ok(deadline) => Some(deadline),
        Err(error) => {
            tracing::debug!(%error, "deadline degraded to flexible");
            None
        }
    }
}

/// Re-normalize a deadline to a full RFC 3339 instant for submission.
///
/// Bare dates are pinned to midnight UTC. Unparseable input yields `None`.
#[must_use]
pub fn deadline_to_instant(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Some(date) = parse_bare_date(raw) {
        return Some(format!("{}T00:00:00Z", date.format(DATE_FORMAT)));
    }
    parse_instant(raw)
        .ok()
        .map(|instant| instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}

// ── Skills ─────────────────────────────────────────────────────────

/// Trim, drop empties, and dedupe (case-sensitive) keeping first-seen order.
#[must_use]
pub fn normalize_skills<I, S>(skills: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for skill in skills {
        let trimmed = skill.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_string()) {
            out.push(trimmed.to_string());
        }
    }
    out
}

/// Skills arrive as a JSON array or a comma-separated string.
#[must_use]
pub fn skills_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => normalize_skills(items.iter().filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        })),
        Value::String(s) => normalize_skills(s.split(',')),
        _ => Vec::new(),
    }
}

// ── Prices ─────────────────────────────────────────────────────────

/// Read a price that may be a JSON number or a numeric string.
#[must_use]
pub fn price_from_value(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    price.is_finite().then_some(price)
}

/// Coerce display text such as `"₹1,500"` into a non-negative amount.
///
/// Keeps digits, `.` and `-`, then reads the longest numeric prefix. Anything
/// that does not yield a positive finite number becomes `0`.
#[must_use]
pub fn parse_price_lenient(input: &str) -> f64 {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    let value = (1..=cleaned.len())
        .rev()
        .find_map(|end| cleaned[..end].parse::<f64>().ok())
        .unwrap_or(0.0);
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

/// Validate a user-entered proposal price.
///
/// # Errors
///
/// Returns [`CoreError::InvalidAmount`] unless the price is finite and positive.
pub fn proposal_amount(price: f64) -> Result<f64, CoreError> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(CoreError::InvalidAmount(format!(
            "price must be a positive number, got {price}"
        )))
    }
}

/// Parse and validate a proposal price typed as text.
///
/// # Errors
///
/// Returns [`CoreError::InvalidAmount`] for empty, non-numeric, or non-positive input.
pub fn parse_proposal_amount(input: &str) -> Result<f64, CoreError> {
    let trimmed = input.trim();
    let price = trimmed
        .parse::<f64>()
        .map_err(|_| CoreError::InvalidAmount(format!("not a number: {trimmed:?}")))?;
    proposal_amount(price)
}

/// Render an amount the way chat text shows it (`250`, `99.5`).
#[must_use]
pub fn format_amount(amount: f64) -> String {
    format!("{amount}")
}
