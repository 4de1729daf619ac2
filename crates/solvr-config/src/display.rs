//! Display settings.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Offset from UTC, in minutes, used for deadline hours. `0` shows UTC.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl DisplayConfig {
    /// The configured offset as a chrono [`FixedOffset`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the offset is outside ±24h.
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "display.utc_offset_minutes".into(),
                reason: format!("{} is out of range", self.utc_offset_minutes),
            })
    }
}
