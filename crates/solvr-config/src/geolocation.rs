//! One-shot geolocation settings.

use serde::{Deserialize, Serialize};

const fn default_high_accuracy() -> bool {
    true
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_maximum_age_ms() -> u64 {
    60_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeolocationConfig {
    /// Ask the provider for a high-accuracy fix.
    #[serde(default = "default_high_accuracy")]
    pub high_accuracy: bool,

    /// Upper bound on how long one fix may take.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Cached fixes up to this age are acceptable.
    #[serde(default = "default_maximum_age_ms")]
    pub maximum_age_ms: u64,

    /// Fixed latitude for hosts without a location service.
    #[serde(default)]
    pub latitude: Option<f64>,

    /// Fixed longitude for hosts without a location service.
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            high_accuracy: default_high_accuracy(),
            timeout_ms: default_timeout_ms(),
            maximum_age_ms: default_maximum_age_ms(),
            latitude: None,
            longitude: None,
        }
    }
}

impl GeolocationConfig {
    /// Both coordinates of a fixed position, when configured.
    #[must_use]
    pub fn fixed_position(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_one_shot_fix_parameters() {
        let config = GeolocationConfig::default();
        assert!(config.high_accuracy);
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.maximum_age_ms, 60_000);
        assert!(config.fixed_position().is_none());
    }

    #[test]
    fn fixed_position_needs_both_coordinates() {
        let config = GeolocationConfig {
            latitude: Some(12.9),
            ..Default::default()
        };
        assert!(config.fixed_position().is_none());
    }
}
