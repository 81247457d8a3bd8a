//! Behavioural tests for the pure simulation pipeline using rstest-bdd.

use std::cell::RefCell;

use chrono::{NaiveDate, TimeZone, Utc};
use courier_core::{
    Driver, DriverId, Order, OrderId, OrderUpdate, Route, RouteId, SimulationError,
    SimulationOutcome, SimulationRequest, TrafficLevel, simulate,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const TOLERANCE: f64 = 1e-6;

/// Shared state for simulation scenarios.
#[derive(Debug, Default)]
struct SimulationWorld {
    drivers: RefCell<Vec<Driver>>,
    routes: RefCell<Vec<Route>>,
    orders: RefCell<Vec<Order>>,
    outcome: RefCell<Option<Result<SimulationOutcome, SimulationError>>>,
}

impl SimulationWorld {
    fn add_driver(&self, weekly_hours: f64, active: bool) {
        let mut drivers = self.drivers.borrow_mut();
        let id = drivers.len() as u64 + 1;
        let driver = Driver::new(DriverId(id), format!("Driver {id}"), 0.0, weekly_hours)
            .expect("valid driver")
            .with_active(active);
        drivers.push(driver);
    }

    fn outcome(&self) -> SimulationOutcome {
        match self.outcome.borrow().as_ref() {
            Some(Ok(outcome)) => outcome.clone(),
            Some(Err(err)) => panic!("simulation failed: {err}"),
            None => panic!("simulation has not run"),
        }
    }

    fn error(&self) -> SimulationError {
        match self.outcome.borrow().as_ref() {
            Some(Err(err)) => err.clone(),
            Some(Ok(_)) => panic!("simulation unexpectedly succeeded"),
            None => panic!("simulation has not run"),
        }
    }

    fn only_update(&self) -> OrderUpdate {
        let outcome = self.outcome();
        assert_eq!(outcome.updates.len(), 1, "expected exactly one processed order");
        outcome.updates[0].clone()
    }
}

#[fixture]
fn world() -> SimulationWorld {
    SimulationWorld::default()
}

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date")
}

#[given("an active driver who worked {hours} hours in the past week")]
fn given_active_driver(world: &SimulationWorld, hours: f64) {
    world.add_driver(hours, true);
}

#[given("an inactive driver")]
fn given_inactive_driver(world: &SimulationWorld) {
    world.add_driver(10.0, false);
}

#[given("a {traffic} traffic route of {distance} km with a base time of {minutes} minutes")]
fn given_route(world: &SimulationWorld, traffic: String, distance: f64, minutes: f64) {
    let traffic: TrafficLevel = traffic.parse().expect("known traffic level");
    let mut routes = world.routes.borrow_mut();
    let id = routes.len() as u64 + 1;
    let route = Route::new(
        RouteId(id),
        format!("R{id}"),
        format!("Route {id}"),
        distance,
        traffic,
        minutes,
    )
    .expect("valid route");
    routes.push(route);
}

#[given("a pending order worth {value} on that route")]
fn given_order(world: &SimulationWorld, value: f64) {
    let route_id = world
        .routes
        .borrow()
        .last()
        .map(|route| route.id)
        .expect("a route must be declared first");
    let mut orders = world.orders.borrow_mut();
    let id = orders.len() as u64 + 1;
    let due = Utc
        .with_ymd_and_hms(2024, 5, 1, 18, 0, 0)
        .single()
        .expect("valid timestamp");
    let order = Order::new(OrderId(id), format!("ORD{id}"), "Kiran", value, route_id, due)
        .expect("valid order");
    orders.push(order);
}

#[when("I simulate with {drivers} drivers starting at {start} for at most {max_hours} hours")]
fn when_simulate(world: &SimulationWorld, drivers: i64, start: String, max_hours: f64) {
    let request = SimulationRequest {
        available_drivers: Some(drivers),
        route_start_time: Some(start),
        max_hours_per_driver: Some(max_hours),
    };
    let params = request.validate(run_date()).expect("valid parameters");
    let outcome = simulate(
        &world.orders.borrow(),
        &world.drivers.borrow(),
        &world.routes.borrow(),
        &params,
    );
    world.outcome.replace(Some(outcome));
}

#[then("the delivery takes about {minutes} minutes")]
fn then_delivery_minutes(world: &SimulationWorld, minutes: f64) {
    let update = world.only_update();
    let start = run_date().and_hms_opt(9, 0, 0).expect("valid time");
    let delivered = update
        .outcome
        .actual_delivery_time
        .expect("delivery instant recorded");
    let elapsed = (delivered - start).num_milliseconds() as f64 / 60_000.0;
    assert!(
        (elapsed - minutes).abs() < 0.01,
        "expected about {minutes} minutes, got {elapsed}"
    );
}

#[then("the order is on time")]
fn then_on_time(world: &SimulationWorld) {
    assert_eq!(world.only_update().outcome.is_on_time, Some(true));
}

#[then("the order is late")]
fn then_late(world: &SimulationWorld) {
    assert_eq!(world.only_update().outcome.is_on_time, Some(false));
}

#[then("the fuel cost is {amount}")]
fn then_fuel_cost(world: &SimulationWorld, amount: f64) {
    assert!((world.only_update().outcome.fuel_cost - amount).abs() < TOLERANCE);
}

#[then("the penalty is {amount}")]
fn then_penalty(world: &SimulationWorld, amount: f64) {
    assert!((world.only_update().outcome.penalty - amount).abs() < TOLERANCE);
}

#[then("the bonus is {amount}")]
fn then_bonus(world: &SimulationWorld, amount: f64) {
    assert!((world.only_update().outcome.bonus - amount).abs() < TOLERANCE);
}

#[then("the profit is {amount}")]
fn then_profit(world: &SimulationWorld, amount: f64) {
    let outcome = world.outcome();
    assert!((outcome.updates[0].outcome.profit - amount).abs() < TOLERANCE);
    assert!((outcome.result.total_profit - amount).abs() < TOLERANCE);
}

#[then("the run fails because {available} drivers are available but {requested} were requested")]
fn then_insufficient_drivers(world: &SimulationWorld, available: usize, requested: usize) {
    let err = world.error();
    assert_eq!(
        err,
        SimulationError::InsufficientDrivers {
            requested,
            available,
        }
    );
    assert_eq!(
        err.to_string(),
        format!("only {available} active drivers available, but {requested} requested")
    );
}

#[then("the run fails because there are no pending orders")]
fn then_no_pending_orders(world: &SimulationWorld) {
    assert_eq!(world.error(), SimulationError::NoPendingOrders);
}

#[scenario(path = "tests/features/simulation.feature", index = 0)]
fn rested_driver_on_time(world: SimulationWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/simulation.feature", index = 1)]
fn fatigued_driver_late(world: SimulationWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/simulation.feature", index = 2)]
fn high_value_bonus(world: SimulationWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/simulation.feature", index = 3)]
fn high_value_late_without_bonus(world: SimulationWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/simulation.feature", index = 4)]
fn insufficient_drivers(world: SimulationWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/simulation.feature", index = 5)]
fn no_pending_orders(world: SimulationWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/simulation.feature", index = 6)]
fn high_traffic_surcharge(world: SimulationWorld) {
    let _ = world;
}
