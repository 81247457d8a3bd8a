//! Core allocation and economics engine for courier delivery runs.
//!
//! A run takes a snapshot of drivers, routes and pending orders and:
//! - validates the run parameters ([`SimulationRequest::validate`]);
//! - selects the requested number of active drivers ([`select_drivers`]);
//! - splits the backlog into one contiguous block per driver ([`allocate`]);
//! - walks each block on the driver's own clock until the hour budget is
//!   spent, pricing each delivery ([`economics::evaluate`]);
//! - folds the per-order results into run KPIs ([`RunResult`]).
//!
//! [`simulate`] performs the whole run as a pure function and returns the
//! order updates alongside the result. [`run_simulation`] wraps it with a
//! [`DeliveryStore`], writing every update back in one batch.
//! [`dashboard::summarize`] recomputes KPIs over the full order history.
//!
//! # Examples
//!
//! ```
//! # #[cfg(feature = "store-sqlite")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use courier_core::{
//!     Driver, DriverId, Order, OrderId, Route, RouteId, SimulationRequest, TrafficLevel,
//!     run_simulation, store::SqliteDeliveryStore,
//! };
//!
//! let mut store = SqliteDeliveryStore::open_in_memory()?;
//! store.insert_driver(&Driver::new(DriverId(1), "Asha", 0.0, 30.0)?)?;
//! store.insert_route(&Route::new(RouteId(1), "R1", "Ring Road", 10.0, TrafficLevel::Low, 30.0)?)?;
//! let due = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
//! store.insert_order(&Order::new(OrderId(1), "ORD1", "Priya", 500.0, RouteId(1), due)?)?;
//!
//! let request = SimulationRequest {
//!     available_drivers: Some(1),
//!     route_start_time: Some("09:00".into()),
//!     max_hours_per_driver: Some(6.0),
//! };
//! let run_date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
//! let run = run_simulation(&mut store, &request, run_date)?;
//! assert_eq!(run.result.total_profit, 450.0);
//! assert_eq!(run.written.len(), 1);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "store-sqlite"))]
//! # fn main() {}
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod aggregate;
mod allocation;
pub mod dashboard;
mod driver;
pub mod economics;
mod engine;
mod error;
mod order;
mod params;
mod pool;
mod route;
mod simulation;
pub mod store;
mod timing;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use aggregate::{DriverSummary, OrderDetail, RunResult, round2};
pub use allocation::{allocate, chunk_size};
pub use dashboard::{ChartEntry, DashboardSummary};
pub use driver::{Driver, DriverError, DriverId};
pub use engine::{CompletedRun, dashboard, run_simulation};
pub use error::{RunError, SimulationError};
pub use order::{
    DeliveryOutcome, Order, OrderError, OrderId, OrderStatus, OrderUpdate, ParseOrderStatusError,
};
pub use params::{
    FIELD_AVAILABLE_DRIVERS, FIELD_MAX_HOURS_PER_DRIVER, FIELD_ROUTE_START_TIME, MAX_HOURS_LIMIT,
    SimulationParams, SimulationRequest, StartTime, ValidationError, ValidationReason,
};
pub use pool::select_drivers;
pub use route::{
    MAX_BASE_TIME_MINUTES, MIN_BASE_TIME_MINUTES, MIN_DISTANCE_KM, ParseTrafficLevelError, Route,
    RouteError, RouteId, TrafficLevel,
};
pub use simulation::{SimulationOutcome, simulate};
pub use store::{DeliveryStore, UpdateReport};
pub use timing::{
    DriverClock, FATIGUE_THRESHOLD_HOURS, FATIGUED_SPEED_MULTIPLIER, FatigueMultiplier,
};
