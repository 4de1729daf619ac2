mod login;
mod logout;
mod register;
mod status;

use solvr_config::SolvrConfig;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;

/// Handle `solvr auth <subcommand>`.
pub async fn handle(
    action: &AuthCommands,
    flags: &GlobalFlags,
    config: &SolvrConfig,
) -> anyhow::Result<()> {
    match action {
        AuthCommands::Login(args) => login::handle(args, flags, config).await,
        AuthCommands::Register(args) => register::handle(args, flags, config).await,
        AuthCommands::Logout => logout::handle(flags, config),
        AuthCommands::Status => status::handle(flags, config),
    }
}
