use anyhow::Context;
use serde::Serialize;
use solvr_config::SolvrConfig;
use solvr_core::enums::UserRole;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthRegisterArgs;
use crate::output::output;
use crate::progress::Progress;

#[derive(Serialize)]
struct AuthRegisterResponse {
    registered: bool,
    user_id: String,
    role: UserRole,
}

pub async fn handle(
    args: &AuthRegisterArgs,
    flags: &GlobalFlags,
    config: &SolvrConfig,
) -> anyhow::Result<()> {
    let api = bootstrap::client(config)?;
    let store = bootstrap::identity_store(config)?;

    let progress = Progress::spinner("Creating account...");
    let identity = solvr_auth::register(
        &api,
        &store,
        &args.name,
        &args.email,
        &args.password,
        UserRole::from(args.role),
    )
    .await
    .context("registration failed")?;
    progress.finish_clear();

    output(
        &AuthRegisterResponse {
            registered: true,
            user_id: identity.user_id,
            role: identity.role,
        },
        flags.format,
    )
}
