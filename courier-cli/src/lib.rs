//! Command-line interface for running courier delivery simulations.
#![forbid(unsafe_code)]

use std::{ffi::OsString, io::Write};

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use courier_core::store::SqliteDeliveryStore;
use serde::Serialize;

mod dashboard;
mod error;
mod import;
mod simulate;

pub use error::CliError;

use dashboard::DashboardArgs;
use import::ImportArgs;
use simulate::SimulateArgs;

pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_DATASET: &str = "dataset";
pub(crate) const ARG_AVAILABLE_DRIVERS: &str = "available-drivers";
pub(crate) const ARG_ROUTE_START_TIME: &str = "route-start-time";
pub(crate) const ARG_MAX_HOURS_PER_DRIVER: &str = "max-hours-per-driver";
pub(crate) const ARG_RUN_DATE: &str = "run-date";
pub(crate) const ENV_SIMULATE_DATABASE: &str = "COURIER_CMDS_SIMULATE_DATABASE";
pub(crate) const ENV_SIMULATE_AVAILABLE_DRIVERS: &str = "COURIER_CMDS_SIMULATE_AVAILABLE_DRIVERS";
pub(crate) const ENV_SIMULATE_ROUTE_START_TIME: &str = "COURIER_CMDS_SIMULATE_ROUTE_START_TIME";
pub(crate) const ENV_SIMULATE_MAX_HOURS_PER_DRIVER: &str =
    "COURIER_CMDS_SIMULATE_MAX_HOURS_PER_DRIVER";
pub(crate) const ENV_DASHBOARD_DATABASE: &str = "COURIER_CMDS_DASHBOARD_DATABASE";
pub(crate) const ENV_IMPORT_DATABASE: &str = "COURIER_CMDS_IMPORT_DATABASE";
pub(crate) const ENV_IMPORT_DATASET: &str = "COURIER_CMDS_IMPORT_DATASET_PATH";

/// Run the courier CLI with the current process arguments and environment.
///
/// Command output is written to standard output as pretty-printed JSON.
///
/// # Errors
///
/// Returns a [`CliError`] describing the first failure encountered.
pub fn run() -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_with(std::env::args_os(), &mut stdout)
}

fn run_with<I, T>(argv: I, writer: &mut dyn Write) -> Result<(), CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(argv)?;
    match cli.command {
        Command::Simulate(args) => simulate::run_simulate(args, writer),
        Command::Dashboard(args) => dashboard::run_dashboard(args, writer),
        Command::Import(args) => import::run_import(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "courier",
    about = "Allocate pending orders to drivers and report delivery economics",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate a delivery run and write the outcome back to the store.
    Simulate(SimulateArgs),
    /// Report KPIs over every order in the store.
    Dashboard(DashboardArgs),
    /// Load drivers, routes and orders from a JSON dataset.
    Import(ImportArgs),
}

/// Fail unless `path` names an existing regular file.
pub(crate) fn require_existing_file(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match courier_fs::is_regular_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub(crate) fn open_store(path: &Utf8Path) -> Result<SqliteDeliveryStore, CliError> {
    SqliteDeliveryStore::open(path.as_std_path()).map_err(|source| CliError::OpenStore {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_json<T>(writer: &mut dyn Write, value: &T) -> Result<(), CliError>
where
    T: Serialize,
{
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
