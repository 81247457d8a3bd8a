//! Failures a simulation run reports to its caller.
//!
//! None of these are transient: each is caused by invalid input or store
//! state, so callers should surface them rather than retry.

use thiserror::Error;

use crate::{OrderId, RouteId, ValidationError};

/// Errors returned by the pure simulation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// Simulation parameters were malformed or missing.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Fewer active drivers exist than were requested.
    #[error("only {available} active drivers available, but {requested} requested")]
    InsufficientDrivers {
        /// Drivers the caller asked for.
        requested: usize,
        /// Active drivers the store holds.
        available: usize,
    },
    /// The backlog held no pending orders.
    #[error("no pending orders to process")]
    NoPendingOrders,
    /// An order referenced a route the store does not hold.
    #[error("order {order_id} references route {route_id}, which does not exist")]
    UnresolvedRoute {
        /// Order being processed.
        order_id: OrderId,
        /// Route it pointed at.
        route_id: RouteId,
    },
    /// A delivery would finish outside the representable calendar.
    #[error("order {order_id} on route {route_id} would finish at an unrepresentable time")]
    DeliveryTimeOutOfRange {
        /// Order being processed.
        order_id: OrderId,
        /// Route whose base time produced the overflow.
        route_id: RouteId,
    },
}

/// Errors returned by [`run_simulation`](crate::run_simulation), which adds
/// store access around the pure pipeline.
#[derive(Debug, Error)]
pub enum RunError<E>
where
    E: std::error::Error + 'static,
{
    /// The simulation itself rejected the input or state.
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    /// Reading from or writing to the record store failed.
    #[error("record store failure: {0}")]
    Store(#[source] E),
}

impl<E> RunError<E>
where
    E: std::error::Error + 'static,
{
    /// Return the simulation error, if this is one.
    #[must_use]
    pub const fn as_simulation(&self) -> Option<&SimulationError> {
        match self {
            Self::Simulation(err) => Some(err),
            Self::Store(_) => None,
        }
    }
}
