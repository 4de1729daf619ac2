//! Session identity storage location.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Where the acting user's identity is kept between runs.
    /// Empty means `<config dir>/solvr/session.toml`.
    #[serde(default)]
    pub identity_path: String,
}

impl SessionConfig {
    /// Resolved identity file path, if one can be determined.
    #[must_use]
    pub fn identity_path(&self) -> Option<PathBuf> {
        if self.identity_path.is_empty() {
            dirs::config_dir().map(|p| p.join("solvr").join("session.toml"))
        } else {
            Some(PathBuf::from(&self.identity_path))
        }
    }
}
