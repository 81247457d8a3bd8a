//! Facade crate for the courier delivery simulation engine.
//!
//! This crate re-exports the core domain types and entry points, and exposes
//! the SQLite record store behind the `store-sqlite` feature.

#![forbid(unsafe_code)]

pub use courier_core::{
    CompletedRun, DashboardSummary, DeliveryOutcome, DeliveryStore, Driver, DriverId, Order,
    OrderId, OrderStatus, OrderUpdate, Route, RouteId, RunError, RunResult, SimulationError,
    SimulationOutcome, SimulationParams, SimulationRequest, TrafficLevel, UpdateReport,
    ValidationError, dashboard, economics, run_simulation, simulate,
};

#[cfg(feature = "store-sqlite")]
pub use courier_core::store::{SqliteDeliveryStore, SqliteStoreError};
