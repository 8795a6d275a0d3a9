//! Command-line interface for planning Kurir delivery routes.
//!
//! `kurir plan <path>` reads a JSON delivery plan (a depot and a list of
//! orders), validates every coordinate against the service region, solves
//! one route per order and one multi-drop route over every drop point, and
//! prints the routes with their summary rows as JSON.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod fs;
mod logging;
mod plan;

pub use error::CliError;

use plan::{PlanArgs, run_plan};

pub(crate) const ARG_PLAN_PATH: &str = "plan-path";
pub(crate) const ENV_PLAN_PATH: &str = "KURIR_CMDS_PLAN_PLAN_PATH";

/// Run the Kurir CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments, configuration, the delivery plan, or
/// any route solve fail.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Plan(args) => run_plan(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "kurir",
    about = "Delivery route planning for a single depot",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan per-order and multi-drop routes for a delivery plan.
    Plan(PlanArgs),
}

#[cfg(test)]
mod tests;
