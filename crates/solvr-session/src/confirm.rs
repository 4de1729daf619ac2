//! Confirmation and submission workflow.
//!
//! Turns the current brief plus one location fix into a single
//! `POST /assignment/create`. Validation failures are errors; environmental
//! failures (location, backend) are outcomes with a narrative line.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use solvr_auth::SessionContext;
use solvr_client::{ClientError, MarketplaceApi};
use solvr_core::CoreError;
use solvr_core::brief::BriefState;
use solvr_core::entities::{GeoPoint, SubmissionPayload};
use tokio_util::sync::CancellationToken;

use crate::cancel::{ensure_live, or_cancel};
use crate::geo::{GeoOptions, GeolocationProvider, acquire};

pub const CONFIRMED_TEXT: &str = "Project brief confirmed and sent to backend.";

/// How a confirmation ended, short of a validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The backend stored the assignment.
    Submitted { assignment_id: Option<String> },
    /// No location fix; nothing was sent.
    LocationUnavailable(String),
    /// The backend call failed. `status` is `None` for transport errors.
    Failed { status: Option<u16>, detail: String },
}

impl ConfirmOutcome {
    /// The assistant line describing this outcome.
    #[must_use]
    pub fn narrative(&self) -> String {
        match self {
            Self::Submitted { .. } => CONFIRMED_TEXT.to_string(),
            Self::LocationUnavailable(reason) => {
                format!("Could not get your location ({reason}). The brief was not sent.")
            }
            Self::Failed { status, .. } => format!(
                "Could not save the brief — server returned {}",
                status.map_or_else(|| "unknown".to_string(), |s| s.to_string())
            ),
        }
    }

    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted { .. })
    }
}

/// Releases the in-flight flag on drop, including on cancellation.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, CoreError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| CoreError::ConfirmInFlight)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Dispatches confirmed briefs. At most one confirmation per workflow is in
/// flight at a time; a concurrent call fails with
/// [`CoreError::ConfirmInFlight`].
#[derive(Debug)]
pub struct ConfirmationWorkflow {
    options: GeoOptions,
    currency: String,
    in_flight: AtomicBool,
}

impl ConfirmationWorkflow {
    #[must_use]
    pub fn new(options: GeoOptions, currency: impl Into<String>) -> Self {
        Self {
            options,
            currency: currency.into(),
            in_flight: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Confirm `state`.
    ///
    /// 1. A brief still at the sentinel title fails before any I/O.
    /// 2. One location fix, bounded by the configured timeout.
    /// 3. One `create_assignment` call with the resolved payload.
    ///
    /// # Errors
    ///
    /// - [`CoreError::BriefIncomplete`] for a sentinel brief.
    /// - [`CoreError::ConfirmInFlight`] if another confirmation is running.
    /// - [`CoreError::Cancelled`] if `cancel` fires before the outcome is known.
    pub async fn confirm(
        &self,
        state: &BriefState,
        api: &dyn MarketplaceApi,
        geo: &dyn GeolocationProvider,
        ctx: &SessionContext,
        cancel: &CancellationToken,
    ) -> Result<ConfirmOutcome, CoreError> {
        if state.is_pending() {
            return Err(CoreError::BriefIncomplete);
        }
        let _guard = InFlight::acquire(&self.in_flight)?;
        ensure_live(cancel)?;

        let location = match or_cancel(acquire(geo, &self.options), cancel).await? {
            Ok(point) => point,
            Err(error) => {
                tracing::warn!(%error, "no location fix for confirmation");
                return Ok(ConfirmOutcome::LocationUnavailable(error.to_string()));
            }
        };

        let payload = SubmissionPayload::build(
            ctx.user_id(),
            state.submission_source(&self.currency),
            &state.brief().title,
            location,
            Utc::now(),
        );
        ensure_live(cancel)?;

        match or_cancel(api.create_assignment(&payload), cancel).await? {
            Ok(created) => {
                tracing::info!(
                    id = created.id.as_deref().unwrap_or("-"),
                    title = payload.title(),
                    price = payload.price(),
                    "brief submitted"
                );
                Ok(ConfirmOutcome::Submitted {
                    assignment_id: created.id,
                })
            }
            Err(error) => {
                tracing::warn!(%error, "brief submission failed");
                Ok(ConfirmOutcome::Failed {
                    status: error.status(),
                    detail: error.to_string(),
                })
            }
        }
    }
}

/// Result of sharing the current position with the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationShare {
    pub location: Option<GeoPoint>,
    pub narrative: String,
}

impl LocationShare {
    fn failed(reason: impl std::fmt::Display) -> Self {
        Self {
            location: None,
            narrative: format!("Location sharing failed: {reason}"),
        }
    }
}

/// Acquire one fix and post it to `/users/{id}/location`.
///
/// Failures are reported through [`LocationShare::narrative`].
///
/// # Errors
///
/// [`CoreError::Cancelled`] if `cancel` fires first.
pub async fn share_location(
    api: &dyn MarketplaceApi,
    geo: &dyn GeolocationProvider,
    ctx: &SessionContext,
    options: &GeoOptions,
    cancel: &CancellationToken,
) -> Result<LocationShare, CoreError> {
    let Some(user_id) = ctx.user_id() else {
        return Ok(LocationShare::failed("not logged in"));
    };

    let point = match or_cancel(acquire(geo, options), cancel).await? {
        Ok(point) => point,
        Err(error) => return Ok(LocationShare::failed(error)),
    };

    ensure_live(cancel)?;
    match or_cancel(api.share_location(user_id, point), cancel).await? {
        Ok(()) => {
            tracing::info!(user_id, "location shared");
            Ok(LocationShare {
                location: Some(point),
                narrative: format!(
                    "Location shared (lat: {:.5}, lon: {:.5})",
                    point.latitude, point.longitude
                ),
            })
        }
        Err(ClientError::Api { status, .. }) => {
            Ok(LocationShare::failed(format!("server returned {status}")))
        }
        Err(error) => Ok(LocationShare::failed(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn narratives() {
        assert_eq!(
            ConfirmOutcome::Submitted {
                assignment_id: None
            }
            .narrative(),
            CONFIRMED_TEXT
        );
        assert_eq!(
            ConfirmOutcome::Failed {
                status: Some(500),
                detail: String::new()
            }
            .narrative(),
            "Could not save the brief — server returned 500"
        );
        assert_eq!(
            ConfirmOutcome::Failed {
                status: None,
                detail: String::new()
            }
            .narrative(),
            "Could not save the brief — server returned unknown"
        );
    }

    #[test]
    fn in_flight_flag_is_exclusive_and_released() {
        let flag = AtomicBool::new(false);
        let guard = InFlight::acquire(&flag).unwrap();
        assert!(matches!(
            InFlight::acquire(&flag),
            Err(CoreError::ConfirmInFlight)
        ));
        drop(guard);
        assert!(InFlight::acquire(&flag).is_ok());
    }
}
