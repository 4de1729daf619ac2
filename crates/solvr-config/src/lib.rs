//! # solvr-config
//!
//! Layered configuration loading for the solvr client using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SOLVR_*` prefix, `__` as separator)
//! 2. Project-level `.solvr/config.toml`
//! 3. User-level `~/.config/solvr/config.toml`
//! 4. Built-in defaults
//!
//! `SOLVR_BACKEND__BASE_URL` maps to `backend.base_url`,
//! `SOLVR_GEOLOCATION__TIMEOUT_MS` to `geolocation.timeout_ms`, and so on.
//!
//! ```no_run
//! use solvr_config::SolvrConfig;
//!
//! let config = SolvrConfig::load_with_dotenv().expect("config");
//! println!("backend: {}", config.backend.base_url());
//! ```

mod backend;
mod display;
mod error;
mod geolocation;
mod negotiation;
mod session;

pub use backend::{BackendConfig, DEFAULT_BASE_URL};
pub use display::DisplayConfig;
pub use error::ConfigError;
pub use geolocation::GeolocationConfig;
pub use negotiation::NegotiationConfig;
pub use session::SessionConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project-local config file, relative to the working directory.
pub const PROJECT_CONFIG_PATH: &str = ".solvr/config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SolvrConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub geolocation: GeolocationConfig,
    #[serde(default)]
    pub negotiation: NegotiationConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl SolvrConfig {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Does not read `.env`; use [`load_with_dotenv`](Self::load_with_dotenv) for that.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.env` (if present) and then [`load`](Self::load).
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(PROJECT_CONFIG_PATH);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("SOLVR_").split("__"))
    }

    /// Check cross-field constraints figment cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.backend.validate()?;
        self.display.offset()?;
        Ok(())
    }

    /// Path to the user-global config file.
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("solvr").join("config.toml"))
    }

    /// Missing `.env` is not an error.
    fn load_dotenv() {
        let _ = dotenvy::dotenv();
    }
}
