//! Dashboard command implementation for the courier CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_DATABASE, CliError, ENV_DASHBOARD_DATABASE, open_store, require_existing_file, write_json,
};

/// CLI arguments for the `dashboard` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "dashboard",
    long_about = "Recompute on-time, late and pending counts, total profit \
                 and fuel cost by traffic level over every order in the \
                 record store. The summary is printed as JSON.",
    about = "Report delivery KPIs"
)]
#[ortho_config(prefix = "COURIER")]
pub(crate) struct DashboardArgs {
    /// Path to the SQLite record store.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

/// Resolved `dashboard` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DashboardConfig {
    pub(crate) database: Utf8PathBuf,
}

impl TryFrom<DashboardArgs> for DashboardConfig {
    type Error = CliError;

    fn try_from(args: DashboardArgs) -> Result<Self, Self::Error> {
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_DASHBOARD_DATABASE,
        })?;
        Ok(Self { database })
    }
}

pub(crate) fn run_dashboard(args: DashboardArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = DashboardConfig::try_from(merged)?;
    require_existing_file(&config.database, ARG_DATABASE)?;
    let store = open_store(&config.database)?;
    let summary =
        courier_core::dashboard(&store).map_err(|source| CliError::ReadDashboard {
            path: config.database.clone(),
            source,
        })?;
    write_json(writer, &summary)
}
