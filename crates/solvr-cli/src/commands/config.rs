use serde::Serialize;
use solvr_config::{PROJECT_CONFIG_PATH, SolvrConfig};

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
struct ConfigSources {
    global: Option<String>,
    project: &'static str,
    env_prefix: &'static str,
}

#[derive(Serialize)]
struct ConfigResponse<'a> {
    sources: ConfigSources,
    effective: &'a SolvrConfig,
}

/// Handle `solvr config`. The configuration holds no secrets, so it is
/// printed as loaded.
pub fn handle(flags: &GlobalFlags, config: &SolvrConfig) -> anyhow::Result<()> {
    let response = ConfigResponse {
        sources: ConfigSources {
            global: SolvrConfig::global_config_path().map(|path| path.display().to_string()),
            project: PROJECT_CONFIG_PATH,
            env_prefix: "SOLVR_",
        },
        effective: config,
    };
    output(&response, flags.format)
}
