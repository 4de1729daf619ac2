use anyhow::Context;
use serde::Serialize;
use solvr_client::MarketplaceApi;
use solvr_config::SolvrConfig;
use solvr_core::CoreError;
use solvr_core::entities::{GeoPoint, MatchedSolver};
use solvr_session::geo::{GeoOptions, acquire};

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::MatchArgs;
use crate::output::output;
use crate::progress::Progress;

#[derive(Serialize)]
struct MatchRow {
    rank: usize,
    id: String,
    name: String,
    score: f64,
    rate: String,
}

impl MatchRow {
    fn ranked(solvers: Vec<MatchedSolver>, currency: &str) -> Vec<Self> {
        solvers
            .into_iter()
            .enumerate()
            .map(|(index, matched)| {
                let rate = matched.rate_label(currency);
                Self {
                    rank: index + 1,
                    id: matched.user.id,
                    name: matched.user.name,
                    score: matched.score,
                    rate,
                }
            })
            .collect()
    }
}

/// Handle `solvr match <description>`. Backend order is kept as the ranking.
pub async fn handle(
    args: &MatchArgs,
    flags: &GlobalFlags,
    config: &SolvrConfig,
) -> anyhow::Result<()> {
    let description = args.description.trim();
    if description.is_empty() {
        anyhow::bail!("description must not be empty");
    }

    let location = match (args.latitude, args.longitude) {
        (Some(latitude), Some(longitude)) => GeoPoint::new(latitude, longitude),
        _ => {
            let geo = bootstrap::geolocation(config);
            acquire(&geo, &GeoOptions::from_config(&config.geolocation))
                .await
                .map_err(CoreError::from)
                .context("no location to match around; pass --latitude and --longitude")?
        }
    };

    let api = bootstrap::client(config)?;
    let progress = Progress::spinner("Finding solvers...");
    let solvers = api
        .match_solvers(description, location)
        .await
        .context("solver matching failed")?;
    progress.finish_clear();
    tracing::debug!(count = solvers.len(), "solvers matched");

    output(
        &MatchRow::ranked(solvers, &config.negotiation.currency_symbol),
        flags.format,
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use solvr_core::entities::{MatchedSolver, SolverProfile};

    use super::MatchRow;

    fn solver(id: &str, score: f64) -> MatchedSolver {
        MatchedSolver {
            user: SolverProfile {
                id: id.into(),
                name: format!("Solver {id}"),
                role: "solver".into(),
                price_per_job: None,
            },
            score,
        }
    }

    #[test]
    fn ranking_keeps_backend_order() {
        let rows = MatchRow::ranked(vec![solver("b", 0.2), solver("a", 0.9)], "₹");
        let order: Vec<(usize, &str)> = rows.iter().map(|r| (r.rank, r.id.as_str())).collect();
        assert_eq!(order, vec![(1, "b"), (2, "a")]);
        assert_eq!(rows[0].rate, "---");
    }
}
