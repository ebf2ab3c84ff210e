//! Command-line interface for the Shopwalk route planner.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod fs;
mod plan;

pub use error::CliError;

use plan::{PlanArgs, run_plan};

pub(crate) const ARG_PLAN_REQUEST: &str = "request";
pub(crate) const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
pub(crate) const ARG_OSRM_PROFILE: &str = "osrm-profile";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ARG_MAX_SEARCH_DESTINATIONS: &str = "max-search-destinations";
pub(crate) const ARG_MAX_EXPANSIONS: &str = "max-expansions";
pub(crate) const ARG_DEADLINE_MS: &str = "deadline-ms";
pub(crate) const ARG_STRICT_CLOSED_SET: &str = "strict-closed-set";
pub(crate) const ENV_PLAN_REQUEST: &str = "SHOPWALK_CMDS_PLAN_REQUEST_PATH";

/// Run the Shopwalk CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Plan(args) => run_plan(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "shopwalk",
    about = "Plan efficient visiting orders for shopping trips",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Order the stores of a shopping request into a route.
    Plan(PlanArgs),
}

#[cfg(test)]
mod tests;
