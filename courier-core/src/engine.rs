//! Store-backed entry points: run a simulation and read the dashboard.

use chrono::NaiveDate;
use log::info;

use crate::{
    DeliveryStore, RunError, RunResult, SimulationError, SimulationRequest, UpdateReport,
    dashboard::{DashboardSummary, summarize},
    simulate,
};

/// A finished run and the orders it wrote back.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedRun {
    /// KPIs and per-order details.
    pub result: RunResult,
    /// Orders persisted as delivered.
    pub written: UpdateReport,
}

/// Validate `request`, simulate against the store's records and persist the
/// outcome.
///
/// Parameters are checked before the store is read. The store is written
/// once, after the whole run has been computed; a failed run writes nothing.
///
/// # Errors
///
/// Returns [`RunError::Simulation`] for invalid parameters or state and
/// [`RunError::Store`] when reading or writing records fails.
pub fn run_simulation<S>(
    store: &mut S,
    request: &SimulationRequest,
    run_date: NaiveDate,
) -> Result<CompletedRun, RunError<S::Error>>
where
    S: DeliveryStore,
{
    let params = request
        .validate(run_date)
        .map_err(SimulationError::from)?;
    let drivers = store.active_drivers().map_err(RunError::Store)?;
    let orders = store.pending_orders().map_err(RunError::Store)?;
    let routes = store.routes().map_err(RunError::Store)?;
    info!(
        "starting run on {run_date} at {}: {} drivers requested, {} active, {} pending orders",
        params.route_start,
        params.available_drivers,
        drivers.len(),
        orders.len()
    );

    let outcome = simulate(&orders, &drivers, &routes, &params)?;
    let written = store
        .apply_updates(&outcome.updates)
        .map_err(RunError::Store)?;
    info!(
        "run finished: {} orders delivered, {} on time, total profit {}",
        outcome.result.processed_orders,
        outcome.result.on_time_deliveries,
        outcome.result.total_profit
    );
    Ok(CompletedRun {
        result: outcome.result,
        written,
    })
}

/// Compute dashboard KPIs over every order in the store.
///
/// # Errors
///
/// Returns the store's error when reading records fails.
pub fn dashboard<S>(store: &S) -> Result<DashboardSummary, S::Error>
where
    S: DeliveryStore,
{
    let orders = store.all_orders()?;
    let routes = store.routes()?;
    Ok(summarize(&orders, &routes))
}
