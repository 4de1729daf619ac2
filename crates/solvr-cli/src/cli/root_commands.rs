use clap::{Args, Subcommand};

use crate::cli::subcommands::{AuthCommands, RoleArg};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Account management.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Describe a project in plain text and confirm the resulting brief.
    Brief,
    /// Negotiate a price with a simulated counterparty.
    Negotiate(NegotiateArgs),
    /// List solvers matched to a description near your location.
    Match(MatchArgs),
    /// Print the effective configuration.
    Config,
}

#[derive(Clone, Debug, Args)]
pub struct NegotiateArgs {
    /// Side to play. Defaults to the role of the stored account.
    #[arg(long = "as", value_enum)]
    pub role: Option<RoleArg>,
}

#[derive(Clone, Debug, Args)]
pub struct MatchArgs {
    /// What the work is about.
    pub description: String,
    /// Latitude to search around. Overrides the configured location.
    #[arg(long, requires = "longitude", allow_hyphen_values = true)]
    pub latitude: Option<f64>,
    /// Longitude to search around. Overrides the configured location.
    #[arg(long, requires = "latitude", allow_hyphen_values = true)]
    pub longitude: Option<f64>,
}
