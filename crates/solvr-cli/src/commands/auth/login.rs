use anyhow::Context;
use serde::Serialize;
use solvr_config::SolvrConfig;
use solvr_core::enums::UserRole;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthLoginArgs;
use crate::output::output;
use crate::progress::Progress;

#[derive(Serialize)]
struct AuthLoginResponse {
    authenticated: bool,
    user_id: String,
    role: UserRole,
    identity_path: String,
}

pub async fn handle(
    args: &AuthLoginArgs,
    flags: &GlobalFlags,
    config: &SolvrConfig,
) -> anyhow::Result<()> {
    let api = bootstrap::client(config)?;
    let store = bootstrap::identity_store(config)?;

    let progress = Progress::spinner("Logging in...");
    let identity = solvr_auth::login(
        &api,
        &store,
        &args.email,
        &args.password,
        UserRole::from(args.role),
    )
    .await
    .context("login failed")?;
    progress.finish_clear();

    output(
        &AuthLoginResponse {
            authenticated: true,
            user_id: identity.user_id,
            role: identity.role,
            identity_path: store.path().display().to_string(),
        },
        flags.format,
    )
}
