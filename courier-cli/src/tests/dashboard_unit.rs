//! Focused unit tests covering the dashboard command.

use super::helpers::{seeded_database, workspace};
use super::*;
use crate::dashboard::{DashboardArgs, DashboardConfig};
use courier_core::DashboardSummary;
use rstest::rstest;

#[rstest]
fn converting_dashboard_without_database_errors() {
    let err = DashboardConfig::try_from(DashboardArgs::default())
        .expect_err("missing database should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_DATABASE);
            assert_eq!(env, ENV_DASHBOARD_DATABASE);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn dashboard_command_prints_summary_json() {
    let (_tmp, root) = workspace();
    let database = seeded_database(&root);
    let argv = ["courier", "dashboard", "--database", database.as_str()];

    let mut output = Vec::new();
    run_with(argv, &mut output).expect("dashboard succeeds");

    let summary: DashboardSummary =
        serde_json::from_slice(&output).expect("output should be a dashboard summary");
    assert_eq!(summary.total_orders, 2);
    assert_eq!(summary.pending_orders, 2);
    assert_eq!(summary.on_time_deliveries, 0);
    assert_eq!(summary.efficiency_score, 0.0);
    assert!(summary.fuel_cost_data.is_empty());
}

#[rstest]
fn dashboard_rejects_directory_as_database() {
    let (_tmp, root) = workspace();
    let argv = ["courier", "dashboard", "--database", root.as_str()];

    let mut output = Vec::new();
    let err = run_with(argv, &mut output).expect_err("directory should be rejected");
    match err {
        CliError::SourcePathNotFile { field, path } => {
            assert_eq!(field, ARG_DATABASE);
            assert_eq!(path, root);
        }
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}
