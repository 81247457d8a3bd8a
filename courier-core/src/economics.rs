//! Per-order economics: fuel, punctuality, penalty, bonus and profit.
//!
//! Values are left unrounded here. Rounding happens once, when a run's
//! totals are finalised.

use crate::{Route, TrafficLevel};

/// Fuel cost per kilometre on every route.
pub const BASE_FUEL_COST_PER_KM: f64 = 5.0;
/// Extra fuel cost per kilometre on high-traffic routes.
pub const HIGH_TRAFFIC_SURCHARGE_PER_KM: f64 = 2.0;
/// Minutes a delivery may exceed the route's nominal time and still count
/// as on time.
pub const ON_TIME_TOLERANCE_MINUTES: f64 = 10.0;
/// Flat penalty for a late delivery.
pub const LATE_PENALTY: f64 = 50.0;
/// Order value above which an on-time delivery earns a bonus.
pub const HIGH_VALUE_THRESHOLD: f64 = 1000.0;
/// Share of the order value paid as a high-value bonus.
pub const HIGH_VALUE_BONUS_RATE: f64 = 0.10;

/// Economics of a single delivered order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderEconomics {
    /// Whether the delivery met the on-time tolerance.
    pub is_on_time: bool,
    /// Fuel spent on the route.
    pub fuel_cost: f64,
    /// Late-delivery penalty.
    pub penalty: f64,
    /// High-value bonus.
    pub bonus: f64,
    /// `value + bonus - penalty - fuel_cost`.
    pub profit: f64,
}

/// Fuel cost of driving `route` once.
#[must_use]
pub fn fuel_cost(route: &Route) -> f64 {
    let mut cost = route.distance_km * BASE_FUEL_COST_PER_KM;
    if route.traffic_level == TrafficLevel::High {
        cost += route.distance_km * HIGH_TRAFFIC_SURCHARGE_PER_KM;
    }
    cost
}

/// Whether a delivery taking `delivery_minutes` is on time for `route`.
///
/// The comparison is against the route's nominal time, not the order's
/// scheduled slot.
#[must_use]
pub fn is_on_time(route: &Route, delivery_minutes: f64) -> bool {
    delivery_minutes <= route.base_time_minutes + ON_TIME_TOLERANCE_MINUTES
}

/// Evaluate an order of `value` delivered along `route` in
/// `delivery_minutes`.
///
/// # Examples
/// ```
/// use courier_core::{Route, RouteId, TrafficLevel, economics};
///
/// let route = Route::new(RouteId(1), "R1", "Ring Road", 10.0, TrafficLevel::Low, 30.0)
///     .unwrap();
/// let outcome = economics::evaluate(&route, 500.0, 30.0);
/// assert!(outcome.is_on_time);
/// assert_eq!(outcome.fuel_cost, 50.0);
/// assert_eq!(outcome.profit, 450.0);
/// ```
#[must_use]
pub fn evaluate(route: &Route, value: f64, delivery_minutes: f64) -> OrderEconomics {
    let is_on_time = is_on_time(route, delivery_minutes);
    let fuel_cost = fuel_cost(route);
    let penalty = if is_on_time { 0.0 } else { LATE_PENALTY };
    let bonus = if is_on_time && value > HIGH_VALUE_THRESHOLD {
        value * HIGH_VALUE_BONUS_RATE
    } else {
        0.0
    };
    OrderEconomics {
        is_on_time,
        fuel_cost,
        penalty,
        bonus,
        profit: value + bonus - penalty - fuel_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FatigueMultiplier, RouteId};
    use rstest::{fixture, rstest};

    fn route(traffic: TrafficLevel) -> Route {
        Route::new(RouteId(1), "R1", "Ring Road", 10.0, traffic, 30.0).expect("valid route")
    }

    #[fixture]
    fn low_route() -> Route {
        route(TrafficLevel::Low)
    }

    #[rstest]
    #[case(TrafficLevel::Low, 50.0)]
    #[case(TrafficLevel::Medium, 50.0)]
    #[case(TrafficLevel::High, 70.0)]
    fn fuel_cost_adds_surcharge_only_for_high_traffic(
        #[case] traffic: TrafficLevel,
        #[case] expected: f64,
    ) {
        assert_eq!(fuel_cost(&route(traffic)), expected);
    }

    #[rstest]
    #[case(30.0, true)]
    #[case(40.0, true)]
    #[case(40.01, false)]
    fn tolerance_is_inclusive(low_route: Route, #[case] minutes: f64, #[case] expected: bool) {
        assert_eq!(is_on_time(&low_route, minutes), expected);
    }

    #[rstest]
    fn rested_delivery_is_profitable_and_on_time(low_route: Route) {
        let minutes = FatigueMultiplier::RESTED.delivery_minutes(low_route.base_time_minutes);
        let outcome = evaluate(&low_route, 500.0, minutes);
        assert_eq!(
            outcome,
            OrderEconomics {
                is_on_time: true,
                fuel_cost: 50.0,
                penalty: 0.0,
                bonus: 0.0,
                profit: 450.0,
            }
        );
    }

    #[rstest]
    fn fatigued_delivery_is_late_and_penalised(low_route: Route) {
        let minutes = FatigueMultiplier::FATIGUED.delivery_minutes(low_route.base_time_minutes);
        let outcome = evaluate(&low_route, 500.0, minutes);
        assert!(!outcome.is_on_time);
        assert_eq!(outcome.penalty, LATE_PENALTY);
        assert_eq!(outcome.bonus, 0.0);
        assert_eq!(outcome.profit, 400.0);
    }

    #[rstest]
    #[case(30.0, 200.0)]
    #[case(42.9, 0.0)]
    fn high_value_bonus_requires_punctuality(
        low_route: Route,
        #[case] minutes: f64,
        #[case] bonus: f64,
    ) {
        assert_eq!(evaluate(&low_route, 2000.0, minutes).bonus, bonus);
    }

    #[rstest]
    fn value_at_threshold_earns_no_bonus(low_route: Route) {
        assert_eq!(evaluate(&low_route, HIGH_VALUE_THRESHOLD, 30.0).bonus, 0.0);
    }
}
