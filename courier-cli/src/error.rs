//! Error types emitted by the courier CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use courier_core::{
    DriverError, DriverId, OrderError, OrderId, RouteError, RouteId, RunError,
    store::SqliteStoreError,
};
use thiserror::Error;

/// Errors emitted by the courier CLI.
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
        /// Flag name without leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the path.
        field: &'static str,
        /// The missing path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the path.
        field: &'static str,
        /// The offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the path.
        field: &'static str,
        /// The path being inspected.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Creating the directory that will hold a new database failed.
    #[error("failed to create the directory for database {path:?}: {source}")]
    PrepareDatabaseDir {
        /// Database path whose parent could not be created.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the dataset file failed.
    #[error("failed to open dataset at {path:?}: {source}")]
    OpenDataset {
        /// Dataset location.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Dataset JSON could not be decoded.
    #[error("failed to parse dataset JSON at {path:?}: {source}")]
    ParseDataset {
        /// Dataset location.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// A driver in the dataset violated a field constraint.
    #[error("driver {id} in {path:?} is invalid: {source}")]
    InvalidDriver {
        /// Dataset location.
        path: Utf8PathBuf,
        /// Offending driver.
        id: DriverId,
        /// The violated constraint.
        #[source]
        source: DriverError,
    },
    /// A route in the dataset violated a field constraint.
    #[error("route {id} in {path:?} is invalid: {source}")]
    InvalidRoute {
        /// Dataset location.
        path: Utf8PathBuf,
        /// Offending route.
        id: RouteId,
        /// The violated constraint.
        #[source]
        source: RouteError,
    },
    /// An order in the dataset violated a field constraint.
    #[error("order {id} in {path:?} is invalid: {source}")]
    InvalidOrder {
        /// Dataset location.
        path: Utf8PathBuf,
        /// Offending order.
        id: OrderId,
        /// The violated constraint.
        #[source]
        source: OrderError,
    },
    /// Opening the SQLite record store failed.
    #[error("failed to open record store at {path:?}: {source}")]
    OpenStore {
        /// Database location.
        path: Utf8PathBuf,
        /// Store error.
        #[source]
        source: SqliteStoreError,
    },
    /// Writing the dataset into the store failed; nothing was imported.
    #[error("failed to import dataset into {path:?}: {source}")]
    Import {
        /// Database location.
        path: Utf8PathBuf,
        /// Store error.
        #[source]
        source: SqliteStoreError,
    },
    /// The simulation run failed; no order was updated.
    #[error("simulation against {path:?} failed: {source}")]
    Simulate {
        /// Database location.
        path: Utf8PathBuf,
        /// Run error.
        #[source]
        source: RunError<SqliteStoreError>,
    },
    /// Reading records for the dashboard failed.
    #[error("failed to read dashboard data from {path:?}: {source}")]
    ReadDashboard {
        /// Database location.
        path: Utf8PathBuf,
        /// Store error.
        #[source]
        source: SqliteStoreError,
    },
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
