//! Simulate command implementation for the courier CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use chrono::{Local, NaiveDate};
use clap::Parser;
use courier_core::{SimulationRequest, run_simulation};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_AVAILABLE_DRIVERS, ARG_DATABASE, ARG_MAX_HOURS_PER_DRIVER, ARG_ROUTE_START_TIME,
    ARG_RUN_DATE, CliError, ENV_SIMULATE_AVAILABLE_DRIVERS, ENV_SIMULATE_DATABASE,
    ENV_SIMULATE_MAX_HOURS_PER_DRIVER, ENV_SIMULATE_ROUTE_START_TIME, open_store,
    require_existing_file, write_json,
};

/// CLI arguments for the `simulate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "simulate",
    long_about = "Allocate every pending order in the record store to the \
                 requested number of drivers, price each delivery and write \
                 the outcome back in a single transaction. The run result is \
                 printed as JSON.",
    about = "Simulate a delivery run"
)]
#[ortho_config(prefix = "COURIER")]
pub(crate) struct SimulateArgs {
    /// Path to the SQLite record store.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Number of drivers to allocate orders to.
    #[arg(
        long = ARG_AVAILABLE_DRIVERS,
        value_name = "count",
        allow_negative_numbers = true
    )]
    #[serde(default)]
    pub(crate) available_drivers: Option<i64>,
    /// Shift start on a 24-hour clock, e.g. 09:30.
    #[arg(long = ARG_ROUTE_START_TIME, value_name = "HH:MM")]
    #[serde(default)]
    pub(crate) route_start_time: Option<String>,
    /// Per-driver hour budget, greater than 0 and at most 24.
    #[arg(
        long = ARG_MAX_HOURS_PER_DRIVER,
        value_name = "hours",
        allow_negative_numbers = true
    )]
    #[serde(default)]
    pub(crate) max_hours_per_driver: Option<f64>,
    /// Calendar date the shift starts on; defaults to today.
    #[arg(long = ARG_RUN_DATE, value_name = "YYYY-MM-DD")]
    #[serde(default)]
    pub(crate) run_date: Option<NaiveDate>,
}

impl SimulateArgs {
    pub(crate) fn into_config(self) -> Result<SimulateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SimulateConfig::try_from(merged)
    }
}

/// Resolved `simulate` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SimulateConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) request: SimulationRequest,
    pub(crate) run_date: NaiveDate,
}

impl TryFrom<SimulateArgs> for SimulateConfig {
    type Error = CliError;

    fn try_from(args: SimulateArgs) -> Result<Self, Self::Error> {
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_SIMULATE_DATABASE,
        })?;
        let available_drivers = args.available_drivers.ok_or(CliError::MissingArgument {
            field: ARG_AVAILABLE_DRIVERS,
            env: ENV_SIMULATE_AVAILABLE_DRIVERS,
        })?;
        let route_start_time = args.route_start_time.ok_or(CliError::MissingArgument {
            field: ARG_ROUTE_START_TIME,
            env: ENV_SIMULATE_ROUTE_START_TIME,
        })?;
        let max_hours_per_driver = args.max_hours_per_driver.ok_or(CliError::MissingArgument {
            field: ARG_MAX_HOURS_PER_DRIVER,
            env: ENV_SIMULATE_MAX_HOURS_PER_DRIVER,
        })?;
        let run_date = args
            .run_date
            .unwrap_or_else(|| Local::now().date_naive());

        Ok(Self {
            database,
            request: SimulationRequest {
                available_drivers: Some(available_drivers),
                route_start_time: Some(route_start_time),
                max_hours_per_driver: Some(max_hours_per_driver),
            },
            run_date,
        })
    }
}

pub(crate) fn run_simulate(args: SimulateArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    run_simulate_with(&config, writer)
}

pub(crate) fn run_simulate_with(
    config: &SimulateConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    // Opening a missing path would silently create an empty database.
    require_existing_file(&config.database, ARG_DATABASE)?;
    let mut store = open_store(&config.database)?;
    let run = run_simulation(&mut store, &config.request, config.run_date).map_err(|source| {
        CliError::Simulate {
            path: config.database.clone(),
            source,
        }
    })?;
    info!(
        "wrote {} delivered orders back to {}",
        run.written.len(),
        config.database
    );
    write_json(writer, &run.result)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SimulateConfig, CliError> {
    let merged = SimulateArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SimulateConfig::try_from(merged)
}
