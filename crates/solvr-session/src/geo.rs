//! One-shot geolocation.
//!
//! A fix is requested at most once per confirmation and is always bounded by
//! [`GeoOptions::timeout`]. There is no retry.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use solvr_config::GeolocationConfig;
use solvr_core::CoreError;
use solvr_core::entities::GeoPoint;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeoError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location unavailable: {0}")]
    Unavailable(String),

    #[error("timed out after {0:?} waiting for a location fix")]
    Timeout(Duration),
}

impl From<GeoError> for CoreError {
    fn from(error: GeoError) -> Self {
        Self::LocationUnavailable(error.to_string())
    }
}

/// Parameters for one position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// A cached fix younger than this is acceptable.
    pub maximum_age: Duration,
}

impl Default for GeoOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(60),
        }
    }
}

impl GeoOptions {
    #[must_use]
    pub const fn from_config(config: &GeolocationConfig) -> Self {
        Self {
            high_accuracy: config.high_accuracy,
            timeout: Duration::from_millis(config.timeout_ms),
            maximum_age: Duration::from_millis(config.maximum_age_ms),
        }
    }
}

#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// # Errors
    ///
    /// [`GeoError`] when no fix can be obtained.
    async fn current_position(&self, options: &GeoOptions) -> Result<GeoPoint, GeoError>;
}

#[async_trait]
impl<P: GeolocationProvider + ?Sized> GeolocationProvider for Box<P> {
    async fn current_position(&self, options: &GeoOptions) -> Result<GeoPoint, GeoError> {
        (**self).current_position(options).await
    }
}

/// Request one fix from `provider`, bounded by `options.timeout`.
///
/// # Errors
///
/// [`GeoError::Timeout`] if the provider does not answer in time, otherwise
/// whatever the provider returned.
pub async fn acquire(
    provider: &dyn GeolocationProvider,
    options: &GeoOptions,
) -> Result<GeoPoint, GeoError> {
    match tokio::time::timeout(options.timeout, provider.current_position(options)).await {
        Ok(result) => result,
        Err(_) => Err(GeoError::Timeout(options.timeout)),
    }
}

/// Always answers with the same point; used for configured coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub GeoPoint);

#[async_trait]
impl GeolocationProvider for FixedLocation {
    async fn current_position(&self, _options: &GeoOptions) -> Result<GeoPoint, GeoError> {
        Ok(self.0)
    }
}

/// Provider for hosts without any location source.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

#[async_trait]
impl GeolocationProvider for NoLocation {
    async fn current_position(&self, _options: &GeoOptions) -> Result<GeoPoint, GeoError> {
        Err(GeoError::Unavailable(
            "no location source configured (set geolocation.latitude and geolocation.longitude)"
                .into(),
        ))
    }
}

/// Reuses the last fix from `inner` while it is younger than
/// [`GeoOptions::maximum_age`].
#[derive(Debug)]
pub struct CachedLocation<P> {
    inner: P,
    last: Mutex<Option<(GeoPoint, Instant)>>,
}

impl<P> CachedLocation<P> {
    pub const fn new(inner: P) -> Self {
        Self {
            inner,
            last: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<P: GeolocationProvider> GeolocationProvider for CachedLocation<P> {
    async fn current_position(&self, options: &GeoOptions) -> Result<GeoPoint, GeoError> {
        let cached = *self
            .last
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some((point, at)) = cached
            && at.elapsed() <= options.maximum_age
        {
            tracing::debug!("reusing cached location fix");
            return Ok(point);
        }

        let point = self.inner.current_position(options).await?;
        *self
            .last
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some((point, Instant::now()));
        Ok(point)
    }
}

/// The provider implied by configuration: fixed coordinates when both are
/// set, otherwise none.
#[must_use]
pub fn provider_from_config(config: &GeolocationConfig) -> Box<dyn GeolocationProvider> {
    match config.fixed_position() {
        Some((latitude, longitude)) => Box::new(FixedLocation(GeoPoint::new(latitude, longitude))),
        None => Box::new(NoLocation),
    }
}
