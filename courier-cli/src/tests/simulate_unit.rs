//! Focused unit tests covering simulate CLI configuration and execution.

use super::helpers::{seeded_database, workspace};
use super::*;
use crate::simulate::{SimulateArgs, SimulateConfig, config_from_layers_for_test, run_simulate_with};
use chrono::{Local, NaiveDate};
use courier_core::{
    DeliveryStore, RunError, RunResult, SimulationError, SimulationRequest, ValidationReason,
};
use rstest::{fixture, rstest};

#[fixture]
fn complete_args() -> SimulateArgs {
    SimulateArgs {
        database: Some(Utf8Path::new("courier.sqlite").to_path_buf()),
        available_drivers: Some(2),
        route_start_time: Some("09:00".to_owned()),
        max_hours_per_driver: Some(8.0),
        run_date: NaiveDate::from_ymd_opt(2024, 5, 1),
    }
}

fn config(database: camino::Utf8PathBuf, start: &str) -> SimulateConfig {
    SimulateConfig {
        database,
        request: SimulationRequest {
            available_drivers: Some(2),
            route_start_time: Some(start.to_owned()),
            max_hours_per_driver: Some(8.0),
        },
        run_date: NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date"),
    }
}

#[rstest]
#[case::database(ARG_DATABASE, ENV_SIMULATE_DATABASE)]
#[case::drivers(ARG_AVAILABLE_DRIVERS, ENV_SIMULATE_AVAILABLE_DRIVERS)]
#[case::start(ARG_ROUTE_START_TIME, ENV_SIMULATE_ROUTE_START_TIME)]
#[case::hours(ARG_MAX_HOURS_PER_DRIVER, ENV_SIMULATE_MAX_HOURS_PER_DRIVER)]
fn converting_without_required_fields_errors(
    complete_args: SimulateArgs,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let mut args = complete_args;
    match field {
        ARG_DATABASE => args.database = None,
        ARG_AVAILABLE_DRIVERS => args.available_drivers = None,
        ARG_ROUTE_START_TIME => args.route_start_time = None,
        _ => args.max_hours_per_driver = None,
    }

    let err = SimulateConfig::try_from(args).expect_err("missing field should error");
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn run_date_defaults_to_today(complete_args: SimulateArgs) {
    let args = SimulateArgs {
        run_date: None,
        ..complete_args
    };
    let before = Local::now().date_naive();
    let config = SimulateConfig::try_from(args).expect("config should build");
    let after = Local::now().date_naive();
    assert!(config.run_date == before || config.run_date == after);
}

#[rstest]
fn simulate_reports_missing_database_without_creating_it() {
    let (_tmp, root) = workspace();
    let database = root.join("absent.sqlite");

    let mut output = Vec::new();
    let err = run_simulate_with(&config(database.clone(), "09:00"), &mut output)
        .expect_err("missing database should error");
    match err {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(field, ARG_DATABASE);
            assert_eq!(path, database);
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
    assert!(!database.exists());
    assert!(output.is_empty());
}

#[rstest]
fn simulate_prints_run_result_and_writes_back() {
    let (_tmp, root) = workspace();
    let database = seeded_database(&root);

    let mut output = Vec::new();
    run_simulate_with(&config(database.clone(), "09:00"), &mut output).expect("run succeeds");

    let result: RunResult = serde_json::from_slice(&output).expect("output should be a run result");
    assert_eq!(result.processed_orders, 2);
    assert_eq!(result.on_time_deliveries, 1);
    assert_eq!(result.late_deliveries, 1);
    assert_eq!(result.total_profit, 2350.0);

    let store = open_store(&database).expect("reopen store");
    assert!(store.pending_orders().expect("read orders").is_empty());
}

#[rstest]
fn simulate_rejects_invalid_start_time_before_writing() {
    let (_tmp, root) = workspace();
    let database = seeded_database(&root);

    let mut output = Vec::new();
    let err = run_simulate_with(&config(database.clone(), "25:00"), &mut output)
        .expect_err("invalid start time should error");
    match err {
        CliError::Simulate {
            source: RunError::Simulation(SimulationError::Validation(validation)),
            ..
        } => {
            assert_eq!(
                validation.reason,
                ValidationReason::BadTimeFormat("25:00".to_owned())
            );
        }
        other => panic!("expected a validation failure, found {other:?}"),
    }

    let store = open_store(&database).expect("reopen store");
    assert_eq!(store.pending_orders().expect("read orders").len(), 2);
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "available_drivers": "many" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "database": "from-file.sqlite",
            "available_drivers": 5,
            "max_hours_per_driver": 6.5,
        }),
        None,
    );
    composer.push_environment(json!({
        "available_drivers": 3,
        "route_start_time": "07:45",
    }));
    composer.push_cli(json!({
        "available_drivers": 2,
        "run_date": "2024-05-01",
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.database, "from-file.sqlite");
    assert_eq!(config.request.available_drivers, Some(2));
    assert_eq!(config.request.route_start_time.as_deref(), Some("07:45"));
    assert_eq!(config.request.max_hours_per_driver, Some(6.5));
    assert_eq!(
        config.run_date,
        NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date")
    );
}
