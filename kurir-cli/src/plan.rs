//! Plan command implementation for the Kurir CLI.

use std::io::{BufReader, Write};
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, ValueEnum};
use kurir_core::{
    Order, OrderBook, OrderDraft, OrderId, Point, PlannerConfig, Region, Route, RouteKey,
    RoutePlanner, SummaryRow, TourSolver, lat_lon, summarize,
};
use kurir_solver_ls::LocalSearchSolver;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::fs::{file_is_file, open_utf8_file};
use crate::logging::{LogLevel, init_logger};
use crate::{ARG_PLAN_PATH, CliError, ENV_PLAN_PATH};

/// Tour solver backend selected with `--solver`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum SolverChoice {
    /// Native guided local search.
    #[default]
    LocalSearch,
    /// `vrp-core` metaheuristics.
    Vrp,
}

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Plan delivery routes for a JSON delivery plan: one route \
                 per order from the depot and back, plus one multi-drop \
                 route covering every drop point. Settings can come from \
                 CLI flags, configuration files, or environment variables.",
    about = "Plan delivery routes"
)]
#[ortho_config(prefix = "KURIR")]
pub(crate) struct PlanArgs {
    /// Path to a JSON file describing the depot and orders.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) plan_path: Option<Utf8PathBuf>,
    /// Average courier speed used to derive travel minutes.
    #[arg(long, value_name = "kmh")]
    #[serde(default)]
    pub(crate) average_speed_kmh: Option<f64>,
    /// Wall-clock budget for each tour search, in seconds.
    #[arg(long, value_name = "secs")]
    #[serde(default)]
    pub(crate) time_budget_secs: Option<u64>,
    /// Most legs on the multi-drop route, the return to the depot included.
    #[arg(long, value_name = "count")]
    #[serde(default)]
    pub(crate) max_stops: Option<usize>,
    /// Tour solver backend.
    #[arg(long, value_enum)]
    #[serde(default)]
    pub(crate) solver: Option<SolverChoice>,
    /// Log verbosity on stderr.
    #[arg(long, value_enum)]
    #[serde(default)]
    pub(crate) log_level: Option<LogLevel>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanConfig {
    /// Path to the JSON delivery plan.
    pub(crate) plan_path: Utf8PathBuf,
    /// Planner settings after layering.
    pub(crate) planner: PlannerConfig,
    /// Selected backend.
    pub(crate) solver: SolverChoice,
    /// Selected verbosity.
    pub(crate) log_level: LogLevel,
}

impl PlanConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        let path = &self.plan_path;
        match file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field: ARG_PLAN_PATH,
                path: path.clone(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field: ARG_PLAN_PATH,
                    path: path.clone(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field: ARG_PLAN_PATH,
                path: path.clone(),
                source,
            }),
        }
    }
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let plan_path = args.plan_path.ok_or(CliError::MissingArgument {
            field: ARG_PLAN_PATH,
            env: ENV_PLAN_PATH,
        })?;

        let defaults = PlannerConfig::default();
        let planner = PlannerConfig {
            average_speed_kmh: args
                .average_speed_kmh
                .unwrap_or(defaults.average_speed_kmh),
            time_budget: args
                .time_budget_secs
                .map_or(defaults.time_budget, Duration::from_secs),
            max_stops: args.max_stops.or(defaults.max_stops),
        };
        planner.validate().map_err(CliError::InvalidSettings)?;

        Ok(Self {
            plan_path,
            planner,
            solver: args.solver.unwrap_or_default(),
            log_level: args.log_level.unwrap_or_default(),
        })
    }
}

/// A named coordinate in the delivery plan file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct PlacePayload {
    pub(crate) name: String,
    pub(crate) lat: f64,
    pub(crate) lon: f64,
}

impl PlacePayload {
    fn into_point(self) -> Point {
        Point::new(self.name, lat_lon(self.lat, self.lon))
    }
}

/// One order in the delivery plan file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct OrderPayload {
    #[serde(default)]
    pub(crate) id: Option<String>,
    pub(crate) courier: String,
    pub(crate) customer: PlacePayload,
    pub(crate) destination: PlacePayload,
    pub(crate) item: String,
    pub(crate) price: f64,
}

/// Delivery plan file contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct PlanFile {
    pub(crate) depot: PlacePayload,
    #[serde(default)]
    pub(crate) orders: Vec<OrderPayload>,
}

/// One stored route in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RouteEntry {
    pub(crate) key: RouteKey,
    pub(crate) route: Route,
}

/// JSON document printed by `kurir plan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct PlanReport {
    pub(crate) routes: Vec<RouteEntry>,
    pub(crate) summary: Vec<SummaryRow>,
}

/// Builds the tour solver for the current plan invocation.
pub(super) trait TourSolverBuilder {
    fn build(&self, config: &PlanConfig) -> Result<Box<dyn TourSolver>, CliError>;
}

pub(super) struct DefaultTourSolverBuilder;

impl TourSolverBuilder for DefaultTourSolverBuilder {
    fn build(&self, config: &PlanConfig) -> Result<Box<dyn TourSolver>, CliError> {
        match config.solver {
            SolverChoice::LocalSearch => Ok(Box::new(LocalSearchSolver::default())),
            SolverChoice::Vrp => build_vrp_solver(),
        }
    }
}

#[cfg(feature = "solver-vrp")]
fn build_vrp_solver() -> Result<Box<dyn TourSolver>, CliError> {
    Ok(Box::new(kurir_solver_vrp::VrpTourSolver::new()))
}

#[cfg(not(feature = "solver-vrp"))]
const fn build_vrp_solver() -> Result<Box<dyn TourSolver>, CliError> {
    Err(CliError::MissingFeature {
        feature: "solver-vrp",
        action: "--solver vrp",
    })
}

pub(super) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let config = resolve_plan_config(args)?;
    init_logger(config.log_level)?;
    let report = execute_plan(&config, &DefaultTourSolverBuilder)?;
    let mut stdout = std::io::stdout().lock();
    write_plan_report(&mut stdout, &report)
}

pub(super) fn run_plan_with(
    args: PlanArgs,
    builder: &dyn TourSolverBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_plan_config(args)?;
    let report = execute_plan(&config, builder)?;
    write_plan_report(writer, &report)
}

fn resolve_plan_config(args: PlanArgs) -> Result<PlanConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn execute_plan(
    config: &PlanConfig,
    builder: &dyn TourSolverBuilder,
) -> Result<PlanReport, CliError> {
    let plan = load_plan(&config.plan_path)?;
    let book = build_book(plan)?;
    let solver = builder.build(config)?;
    let mut planner =
        RoutePlanner::with_config(solver, config.planner.clone()).map_err(CliError::InvalidSettings)?;

    for order in book.orders() {
        planner
            .solve_for_order(book.depot(), order)
            .map_err(|source| CliError::Plan {
                key: RouteKey::from(order.id.clone()),
                source,
            })?;
    }
    if !book.distinct_points().is_empty() {
        planner
            .solve_multi_drop(book.depot(), book.distinct_points())
            .map_err(|source| CliError::Plan {
                key: RouteKey::MultiDrop,
                source,
            })?;
    }
    log::info!(
        "planned {} routes for {} orders",
        planner.len(),
        book.orders().len()
    );

    let summary = summarize(&book, &planner);
    let routes = planner
        .routes()
        .map(|(key, route)| RouteEntry {
            key: key.clone(),
            route: route.clone(),
        })
        .collect();
    Ok(PlanReport { routes, summary })
}

/// Loads a JSON-encoded [`PlanFile`] from disk.
pub(super) fn load_plan(path: &Utf8Path) -> Result<PlanFile, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenPlan {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParsePlan {
        path: path.to_path_buf(),
        source,
    })
}

/// Validate a plan file into an [`OrderBook`] over the default region.
pub(super) fn build_book(plan: PlanFile) -> Result<OrderBook, CliError> {
    let mut book = OrderBook::new(Region::default());
    book.set_depot(plan.depot.into_point())?;
    for (index, payload) in plan.orders.into_iter().enumerate() {
        let order = Order::new(OrderDraft {
            id: payload.id.map(OrderId::new),
            courier: payload.courier,
            customer: payload.customer.into_point(),
            destination: payload.destination.into_point(),
            item: payload.item,
            price: payload.price,
        })
        .map_err(|source| CliError::InvalidOrder { index, source })?;
        book.upsert_order(order)?;
    }
    Ok(book)
}

fn write_plan_report(writer: &mut dyn Write, report: &PlanReport) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerialiseReport)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteReport)?;
    writer.write_all(b"\n").map_err(CliError::WriteReport)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}
