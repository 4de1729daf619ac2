use serde::Serialize;
use solvr_config::SolvrConfig;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
struct AuthLogoutResponse {
    cleared: bool,
}

pub fn handle(flags: &GlobalFlags, config: &SolvrConfig) -> anyhow::Result<()> {
    let store = bootstrap::identity_store(config)?;
    solvr_auth::logout(&store)?;
    output(&AuthLogoutResponse { cleared: true }, flags.format)
}
