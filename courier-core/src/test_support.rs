//! In-memory `DeliveryStore` and record builders used by unit and behaviour
//! tests.

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

use crate::{
    DeliveryStore, Driver, DriverId, Order, OrderId, OrderStatus, OrderUpdate, Route, RouteId,
    TrafficLevel, UpdateReport,
};

/// Errors raised by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryStoreError {
    /// An update named an order the store does not hold.
    #[error("order {0} does not exist")]
    UnknownOrder(OrderId),
    /// A write was rejected on purpose to exercise failure handling.
    #[error("write to order {0} was rejected")]
    WriteRejected(OrderId),
}

/// In-memory `DeliveryStore` implementation used in tests.
///
/// Lookups are linear scans and are intended only for small datasets.
#[derive(Default, Debug, Clone)]
pub struct MemoryStore {
    drivers: Vec<Driver>,
    routes: Vec<Route>,
    orders: Vec<Order>,
    reject_writes_to: Option<OrderId>,
}

impl MemoryStore {
    /// Add a driver.
    #[must_use]
    pub fn with_driver(mut self, driver: Driver) -> Self {
        self.drivers.push(driver);
        self
    }

    /// Add a route.
    #[must_use]
    pub fn with_route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Add an order.
    #[must_use]
    pub fn with_order(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    /// Reject any batch that writes to `order_id`.
    #[must_use]
    pub fn rejecting_writes_to(mut self, order_id: OrderId) -> Self {
        self.reject_writes_to = Some(order_id);
        self
    }

    /// Every order, in insertion order.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Look up an order by id.
    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == id)
    }
}

impl DeliveryStore for MemoryStore {
    type Error = MemoryStoreError;

    fn active_drivers(&self) -> Result<Vec<Driver>, Self::Error> {
        Ok(self
            .drivers
            .iter()
            .filter(|driver| driver.is_active)
            .cloned()
            .collect())
    }

    fn routes(&self) -> Result<Vec<Route>, Self::Error> {
        Ok(self.routes.clone())
    }

    fn pending_orders(&self) -> Result<Vec<Order>, Self::Error> {
        Ok(self
            .orders
            .iter()
            .filter(|order| order.status == OrderStatus::Pending)
            .cloned()
            .collect())
    }

    fn all_orders(&self) -> Result<Vec<Order>, Self::Error> {
        Ok(self.orders.clone())
    }

    fn apply_updates(&mut self, updates: &[OrderUpdate]) -> Result<UpdateReport, Self::Error> {
        // Check the whole batch before touching anything.
        let mut positions = Vec::with_capacity(updates.len());
        for update in updates {
            if self.reject_writes_to == Some(update.order_id) {
                return Err(MemoryStoreError::WriteRejected(update.order_id));
            }
            let position = self
                .orders
                .iter()
                .position(|order| order.id == update.order_id)
                .ok_or(MemoryStoreError::UnknownOrder(update.order_id))?;
            positions.push(position);
        }
        for (position, update) in positions.into_iter().zip(updates) {
            self.orders[position].apply(update);
        }
        Ok(UpdateReport {
            updated: updates.iter().map(|update| update.order_id).collect(),
        })
    }
}

/// Scheduled delivery slot shared by sample orders.
#[must_use]
pub fn sample_due() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Active driver named `Driver {id}` with the given trailing weekly hours.
///
/// # Panics
///
/// Panics when `weekly_hours` is outside `0..=168`.
#[must_use]
pub fn sample_driver(id: u64, weekly_hours: f64) -> Driver {
    Driver::new(DriverId(id), format!("Driver {id}"), 0.0, weekly_hours)
        .unwrap_or_else(|err| panic!("invalid sample driver {id}: {err}"))
}

/// 10 km route `R{id}` named `Route {id}`.
///
/// # Panics
///
/// Panics when `base_time_minutes` is below one minute.
#[must_use]
pub fn sample_route(id: u64, traffic: TrafficLevel, base_time_minutes: f64) -> Route {
    Route::new(
        RouteId(id),
        format!("R{id}"),
        format!("Route {id}"),
        10.0,
        traffic,
        base_time_minutes,
    )
    .unwrap_or_else(|err| panic!("invalid sample route {id}: {err}"))
}

/// Pending order `ORD{id}` on `route_id` worth `value`.
///
/// # Panics
///
/// Panics when `value` is negative.
#[must_use]
pub fn sample_order(id: u64, route_id: u64, value: f64) -> Order {
    Order::new(
        OrderId(id),
        format!("ORD{id}"),
        format!("Customer {id}"),
        value,
        RouteId(route_id),
        sample_due(),
    )
    .unwrap_or_else(|err| panic!("invalid sample order {id}: {err}"))
}
