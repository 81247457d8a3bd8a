//! The pure simulation pipeline.
//!
//! [`simulate`] never touches a store. It returns the run result together
//! with the order updates a caller should persist, so the algorithm can be
//! exercised with plain values.

use std::collections::HashMap;

use log::{debug, warn};

use crate::{
    DeliveryOutcome, Driver, DriverClock, FatigueMultiplier, Order, OrderStatus, OrderUpdate,
    Route, RouteId, RunResult, SimulationError, SimulationParams,
    aggregate::{DriverSummary, DriverTally, OrderDetail, RunAggregator},
    allocate,
    economics::{self, OrderEconomics},
    select_drivers,
};

/// Result of a simulation together with the writes it implies.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    /// KPIs and per-order details.
    pub result: RunResult,
    /// One update per processed order, in processing order.
    pub updates: Vec<OrderUpdate>,
}

/// Allocate `orders` to drivers from `drivers` and compute the economics.
///
/// Only orders in [`OrderStatus::Pending`] take part, in the order given.
/// `drivers` is the whole pool; the requested number of active drivers is
/// selected from it. Each selected driver works through its block of orders
/// on its own clock until its hour budget is spent. Orders left over stay
/// pending and produce no update.
///
/// # Errors
///
/// Returns [`SimulationError::InsufficientDrivers`] when the pool is too
/// small, [`SimulationError::NoPendingOrders`] when there is nothing to do,
/// [`SimulationError::UnresolvedRoute`] when a processed order names a route
/// missing from `routes`, and [`SimulationError::DeliveryTimeOutOfRange`] when
/// a route's base time pushes a delivery past the representable calendar. No
/// partial outcome is returned on error.
///
/// # Examples
/// ```
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use courier_core::{
///     Driver, DriverId, Order, OrderId, Route, RouteId, SimulationRequest, TrafficLevel,
///     simulate,
/// };
///
/// let drivers = vec![Driver::new(DriverId(1), "Asha", 0.0, 30.0).unwrap()];
/// let routes = vec![
///     Route::new(RouteId(1), "R1", "Ring Road", 10.0, TrafficLevel::Low, 30.0).unwrap(),
/// ];
/// let due = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
/// let orders = vec![Order::new(OrderId(1), "ORD1", "Priya", 500.0, RouteId(1), due).unwrap()];
/// let params = SimulationRequest {
///     available_drivers: Some(1),
///     route_start_time: Some("09:00".into()),
///     max_hours_per_driver: Some(6.0),
/// }
/// .validate(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
/// .unwrap();
///
/// let outcome = simulate(&orders, &drivers, &routes, &params).unwrap();
/// assert_eq!(outcome.result.processed_orders, 1);
/// assert_eq!(outcome.result.total_profit, 450.0);
/// assert_eq!(outcome.updates.len(), 1);
/// ```
pub fn simulate(
    orders: &[Order],
    drivers: &[Driver],
    routes: &[Route],
    params: &SimulationParams,
) -> Result<SimulationOutcome, SimulationError> {
    let selected = select_drivers(drivers, params.available_drivers)?;
    let pending: Vec<&Order> = orders
        .iter()
        .filter(|order| order.status == OrderStatus::Pending)
        .collect();
    let blocks = allocate(&pending, selected.len())?;
    let routes: HashMap<RouteId, &Route> = routes.iter().map(|route| (route.id, route)).collect();

    let mut aggregator = RunAggregator::default();
    let mut updates = Vec::with_capacity(pending.len());
    for (driver, block) in selected.iter().zip(blocks) {
        let shift = DriverShift::new(driver, params);
        let summary = shift.work(block, &routes, &mut aggregator, &mut updates)?;
        aggregator.record_driver(summary);
    }

    let remaining = pending.len() - updates.len();
    if remaining > 0 {
        warn!("{remaining} orders remain pending after every driver reached the hour budget");
    }
    Ok(SimulationOutcome {
        result: aggregator.finish(),
        updates,
    })
}

/// One driver working through its block of orders.
struct DriverShift<'a> {
    driver: &'a Driver,
    multiplier: FatigueMultiplier,
    clock: DriverClock,
    max_hours: f64,
    tally: DriverTally,
}

impl<'a> DriverShift<'a> {
    fn new(driver: &'a Driver, params: &SimulationParams) -> Self {
        Self {
            driver,
            multiplier: FatigueMultiplier::for_driver(driver),
            clock: DriverClock::start(params.shift_start()),
            max_hours: params.max_hours_per_driver,
            tally: DriverTally::default(),
        }
    }

    fn work(
        mut self,
        block: &[&Order],
        routes: &HashMap<RouteId, &Route>,
        aggregator: &mut RunAggregator,
        updates: &mut Vec<OrderUpdate>,
    ) -> Result<DriverSummary, SimulationError> {
        for (index, order) in block.iter().enumerate() {
            if !self.clock.has_capacity(self.max_hours) {
                debug!(
                    "driver {} stopped after {:.2} hours with {} orders left",
                    self.driver.id,
                    self.clock.hours_worked(),
                    block.len() - index
                );
                break;
            }
            let route = routes.get(&order.route_id).copied().ok_or(
                SimulationError::UnresolvedRoute {
                    order_id: order.id,
                    route_id: order.route_id,
                },
            )?;
            let (detail, update) = self.deliver(order, route)?;
            aggregator.record_order(detail);
            updates.push(update);
        }
        Ok(self.tally.finish(&self.driver.name, self.clock.hours_worked()))
    }

    fn deliver(
        &mut self,
        order: &Order,
        route: &Route,
    ) -> Result<(OrderDetail, OrderUpdate), SimulationError> {
        let minutes = self.multiplier.delivery_minutes(route.base_time_minutes);
        let (clock, delivered_at) = self.clock.advance(minutes).ok_or(
            SimulationError::DeliveryTimeOutOfRange {
                order_id: order.id,
                route_id: route.id,
            },
        )?;
        let economics = economics::evaluate(route, order.value, minutes);
        self.clock = clock;
        self.tally.record(&economics);

        let OrderEconomics {
            is_on_time,
            fuel_cost,
            penalty,
            bonus,
            profit,
        } = economics;
        let detail = OrderDetail {
            order_id: order.order_code.clone(),
            customer_name: order.customer_name.clone(),
            value: order.value,
            driver_name: self.driver.name.clone(),
            route_name: route.name.clone(),
            is_on_time,
            penalty,
            bonus,
            fuel_cost,
            profit,
            // Finite and positive once the clock has advanced.
            delivery_time: minutes.round() as u64,
        };
        let update = OrderUpdate {
            order_id: order.id,
            driver_id: self.driver.id,
            status: OrderStatus::Delivered,
            outcome: DeliveryOutcome {
                is_on_time: Some(is_on_time),
                penalty,
                bonus,
                fuel_cost,
                profit,
                actual_delivery_time: Some(delivered_at),
            },
        };
        Ok((detail, update))
    }
}
