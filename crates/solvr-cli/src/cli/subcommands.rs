use clap::{Args, Subcommand, ValueEnum};
use solvr_core::enums::{Role, UserRole};

/// Marketplace account role as typed on the command line.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum RoleArg {
    #[value(alias = "buyer")]
    Requester,
    #[value(alias = "solver")]
    Provider,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Requester => Self::Requester,
            RoleArg::Provider => Self::Provider,
        }
    }
}

impl From<RoleArg> for UserRole {
    fn from(role: RoleArg) -> Self {
        Self::from(Role::from(role))
    }
}

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Log in and remember the account on this machine.
    Login(AuthLoginArgs),
    /// Create an account and remember it on this machine.
    Register(AuthRegisterArgs),
    /// Forget the stored account.
    Logout,
    /// Show the stored account.
    Status,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    #[arg(long)]
    pub email: String,
    /// Password. Read from `SOLVR_PASSWORD` when omitted.
    #[arg(long, env = "SOLVR_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long, value_enum, default_value = "requester")]
    pub role: RoleArg,
}

#[derive(Clone, Debug, Args)]
pub struct AuthRegisterArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    /// Password. Read from `SOLVR_PASSWORD` when omitted.
    #[arg(long, env = "SOLVR_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long, value_enum, default_value = "requester")]
    pub role: RoleArg,
}
