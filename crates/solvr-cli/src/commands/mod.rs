mod auth;
mod brief;
mod config;
mod match_solvers;
mod negotiate;

use solvr_config::SolvrConfig;

use crate::cli::{Commands, GlobalFlags};

/// Route a parsed command to its handler.
pub async fn dispatch(
    command: Commands,
    flags: &GlobalFlags,
    config: &SolvrConfig,
) -> anyhow::Result<()> {
    match command {
        Commands::Auth { action } => auth::handle(&action, flags, config).await,
        Commands::Brief => brief::handle(flags, config).await,
        Commands::Negotiate(args) => negotiate::handle(&args, flags, config).await,
        Commands::Match(args) => match_solvers::handle(&args, flags, config).await,
        Commands::Config => config::handle(flags, config),
    }
}
