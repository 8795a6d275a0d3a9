//! Error types emitted by the Kurir CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use kurir_core::{BookError, OrderError, PlanError, RouteKey};
use thiserror::Error;

/// Errors emitted by the Kurir CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Name of the configuration field involved.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        /// Name of the missing Cargo feature.
        feature: &'static str,
        /// Operation that required the feature.
        action: &'static str,
    },
    /// The merged planner settings were rejected.
    #[error("invalid planner settings: {0}")]
    InvalidSettings(#[source] PlanError),
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Name of the configuration field involved.
        field: &'static str,
        /// Filesystem path involved.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Name of the configuration field involved.
        field: &'static str,
        /// Filesystem path involved.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Name of the configuration field involved.
        field: &'static str,
        /// Filesystem path involved.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the delivery plan failed.
    #[error("failed to open delivery plan at {path:?}: {source}")]
    OpenPlan {
        /// Filesystem path involved.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Delivery plan JSON could not be decoded.
    #[error("failed to parse delivery plan JSON at {path:?}: {source}")]
    ParsePlan {
        /// Filesystem path involved.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// An order in the plan carried invalid fields.
    #[error("order {index} in the delivery plan is invalid: {source}")]
    InvalidOrder {
        /// Zero-based index of the order in the plan.
        index: usize,
        /// Underlying error.
        #[source]
        source: OrderError,
    },
    /// The order book rejected the depot or an order.
    #[error("delivery plan rejected: {0}")]
    Book(#[from] BookError),
    /// Planning a route failed.
    #[error("failed to plan {key}: {source}")]
    Plan {
        /// Route that failed to plan.
        key: RouteKey,
        /// Underlying error.
        #[source]
        source: PlanError,
    },
    /// Installing the logger failed.
    #[error("failed to initialise logging: {0}")]
    Logging(#[from] log::SetLoggerError),
    /// Serialising the plan report failed.
    #[error("failed to serialise plan report: {0}")]
    SerialiseReport(#[source] serde_json::Error),
    /// Writing the plan report failed.
    #[error("failed to write plan report: {0}")]
    WriteReport(#[source] std::io::Error),
}
