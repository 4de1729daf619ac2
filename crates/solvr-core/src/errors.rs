//! Cross-cutting error taxonomy for solvr.
//!
//! Validation errors (`InvalidAmount`, `BriefIncomplete`) are resolved locally
//! and never reach the network. Environmental errors (`LocationUnavailable`,
//! `RemoteFailure`) are caught at the confirmation boundary and rendered as
//! chat messages. `ParseFailure` is absorbed into safe defaults by the
//! normalization helpers. Crate-specific errors (`ClientError`, `AuthError`)
//! live in their own crates.

use thiserror::Error;

/// Errors that can be raised by the negotiation and brief state machines.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A proposal price was non-positive, non-finite, or not a number.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A proposal status change was attempted that is not allowed.
    #[error("Invalid state transition: message {id} from {from} to {to}")]
    InvalidTransition { id: String, from: String, to: String },

    /// Message lookup returned no result.
    #[error("Message not found: {0}")]
    NotFound(String),

    /// Confirmation attempted while the brief still holds the sentinel title.
    #[error("Brief incomplete: describe the project before confirming")]
    BriefIncomplete,

    /// Geolocation was denied, timed out, or is unsupported. The confirmation
    /// flow reports this as an outcome instead; commands that need a fix to
    /// proceed get it through `From<GeoError>`.
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    /// A backend call failed at the transport level or returned non-2xx.
    #[error("Remote failure: {0}")]
    RemoteFailure(String),

    /// A value could not be coerced (e.g. a deadline that is not an instant).
    #[error("Parse failure: {0}")]
    ParseFailure(String),

    /// The owning session moved on before an async result arrived.
    #[error("Operation cancelled")]
    Cancelled,

    /// A confirmation for this session is already being dispatched.
    #[error("A confirmation is already in flight")]
    ConfirmInFlight,

    /// The local random source could not be read.
    #[error("Entropy source failed: {0}")]
    Entropy(String),

    /// Input failed validation (unknown role, empty field, ...).
    #[error("Validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entropy_failure_is_not_reported_as_remote() {
        let error = CoreError::Entropy("getrandom: unsupported".into());
        assert_eq!(error.to_string(), "Entropy source failed: getrandom: unsupported");
        assert!(!matches!(error, CoreError::RemoteFailure(_)));
    }
}
