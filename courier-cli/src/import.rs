//! Import command implementation for the courier CLI.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use courier_core::{Driver, Order, Route};
use courier_fs::open_utf8_file;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_DATABASE, ARG_DATASET, CliError, ENV_IMPORT_DATABASE, ENV_IMPORT_DATASET, open_store,
    require_existing_file, write_json,
};

/// CLI arguments for the `import` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "import",
    long_about = "Load drivers, routes and orders from a JSON document of \
                 the form {\"drivers\": [...], \"routes\": [...], \"orders\": \
                 [...]} into the record store, creating the database when it \
                 does not exist. Records are written in one transaction.",
    about = "Import a dataset into the record store"
)]
#[ortho_config(prefix = "COURIER")]
pub(crate) struct ImportArgs {
    /// Path to the JSON dataset.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) dataset_path: Option<Utf8PathBuf>,
    /// Path to the SQLite record store.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

/// Resolved `import` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportConfig {
    pub(crate) dataset_path: Utf8PathBuf,
    pub(crate) database: Utf8PathBuf,
}

impl TryFrom<ImportArgs> for ImportConfig {
    type Error = CliError;

    fn try_from(args: ImportArgs) -> Result<Self, Self::Error> {
        let dataset_path = args.dataset_path.ok_or(CliError::MissingArgument {
            field: ARG_DATASET,
            env: ENV_IMPORT_DATASET,
        })?;
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_IMPORT_DATABASE,
        })?;
        Ok(Self {
            dataset_path,
            database,
        })
    }
}

/// Records loaded from a dataset file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub(crate) struct Dataset {
    #[serde(default)]
    pub(crate) drivers: Vec<Driver>,
    #[serde(default)]
    pub(crate) routes: Vec<Route>,
    #[serde(default)]
    pub(crate) orders: Vec<Order>,
}

impl Dataset {
    /// Check every record against its field constraints.
    fn validate(&self, path: &Utf8Path) -> Result<(), CliError> {
        for driver in &self.drivers {
            driver
                .validate()
                .map_err(|source| CliError::InvalidDriver {
                    path: path.to_path_buf(),
                    id: driver.id,
                    source,
                })?;
        }
        for route in &self.routes {
            route.validate().map_err(|source| CliError::InvalidRoute {
                path: path.to_path_buf(),
                id: route.id,
                source,
            })?;
        }
        for order in &self.orders {
            order.validate().map_err(|source| CliError::InvalidOrder {
                path: path.to_path_buf(),
                id: order.id,
                source,
            })?;
        }
        Ok(())
    }
}

/// Counts reported after a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImportSummary {
    pub(crate) drivers: usize,
    pub(crate) routes: usize,
    pub(crate) orders: usize,
}

pub(crate) fn run_import(args: ImportArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = ImportConfig::try_from(merged)?;
    let summary = import_dataset(&config)?;
    write_json(writer, &summary)
}

pub(crate) fn import_dataset(config: &ImportConfig) -> Result<ImportSummary, CliError> {
    require_existing_file(&config.dataset_path, ARG_DATASET)?;
    let dataset = load_dataset(&config.dataset_path)?;
    dataset.validate(&config.dataset_path)?;

    courier_fs::ensure_parent_dir(&config.database).map_err(|source| {
        CliError::PrepareDatabaseDir {
            path: config.database.clone(),
            source,
        }
    })?;
    let mut store = open_store(&config.database)?;
    store
        .import(&dataset.drivers, &dataset.routes, &dataset.orders)
        .map_err(|source| CliError::Import {
            path: config.database.clone(),
            source,
        })?;

    let summary = ImportSummary {
        drivers: dataset.drivers.len(),
        routes: dataset.routes.len(),
        orders: dataset.orders.len(),
    };
    info!(
        "imported {} drivers, {} routes and {} orders into {}",
        summary.drivers, summary.routes, summary.orders, config.database
    );
    Ok(summary)
}

/// Loads a JSON-encoded [`Dataset`] from disk.
pub(crate) fn load_dataset(path: &Utf8Path) -> Result<Dataset, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenDataset {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseDataset {
        path: path.to_path_buf(),
        source,
    })
}
