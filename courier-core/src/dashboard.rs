//! KPIs over the full order history, independent of any single run.

use std::collections::HashMap;

use crate::{
    Order, OrderStatus, Route, RouteId, TrafficLevel,
    aggregate::{percentage, round2},
};

/// Chart colour for on-time deliveries and low traffic.
pub const COLOR_GREEN: &str = "#10B981";
/// Chart colour for late deliveries and high traffic.
pub const COLOR_RED: &str = "#EF4444";
/// Chart colour for pending orders and medium traffic.
pub const COLOR_AMBER: &str = "#F59E0B";

/// A labelled value in a dashboard chart.
///
/// Status charts carry whole counts and fuel charts carry amounts, so the
/// value type follows the series.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartEntry<V> {
    /// Series label.
    pub name: String,
    /// Count or amount.
    pub value: V,
    /// Hex display colour.
    pub color: String,
}

impl<V> ChartEntry<V> {
    fn new(name: &str, value: V, color: &str) -> Self {
        Self {
            name: name.to_owned(),
            value,
            color: color.to_owned(),
        }
    }
}

/// Dashboard KPIs.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct DashboardSummary {
    /// Profit over every order, rounded to two decimals.
    pub total_profit: f64,
    /// On-time deliveries over *all* orders as a percentage, rounded.
    pub efficiency_score: f64,
    /// Orders of any status.
    pub total_orders: usize,
    /// Delivered orders that were on time.
    pub on_time_deliveries: usize,
    /// Delivered orders that were late.
    pub late_deliveries: usize,
    /// Orders still pending.
    pub pending_orders: usize,
    /// On time, late and pending counts.
    pub delivery_status_data: Vec<ChartEntry<usize>>,
    /// Fuel cost per traffic level, in first-seen order.
    pub fuel_cost_data: Vec<ChartEntry<f64>>,
}

/// Colour used for a traffic level in the fuel chart.
#[must_use]
pub const fn traffic_color(level: TrafficLevel) -> &'static str {
    match level {
        TrafficLevel::High => COLOR_RED,
        TrafficLevel::Medium => COLOR_AMBER,
        TrafficLevel::Low => COLOR_GREEN,
    }
}

/// Summarise `orders`, resolving traffic levels through `routes`.
///
/// The efficiency score divides by the total number of orders, not the
/// number delivered. Orders whose route is unknown are left out of the fuel
/// breakdown but still count everywhere else.
///
/// # Examples
/// ```
/// use courier_core::dashboard::summarize;
///
/// let summary = summarize(&[], &[]);
/// assert_eq!(summary.total_orders, 0);
/// assert_eq!(summary.efficiency_score, 0.0);
/// assert!(summary.fuel_cost_data.is_empty());
/// ```
#[must_use]
pub fn summarize(orders: &[Order], routes: &[Route]) -> DashboardSummary {
    let traffic: HashMap<RouteId, TrafficLevel> = routes
        .iter()
        .map(|route| (route.id, route.traffic_level))
        .collect();

    let mut on_time = 0;
    let mut late = 0;
    let mut pending = 0;
    let mut total_profit = 0.0;
    let mut fuel: Vec<(TrafficLevel, f64)> = Vec::new();

    for order in orders {
        total_profit += order.outcome.profit;
        match (order.status, order.outcome.is_on_time) {
            (OrderStatus::Delivered, Some(true)) => on_time += 1,
            (OrderStatus::Delivered, Some(false)) => late += 1,
            (OrderStatus::Pending, _) => pending += 1,
            _ => {}
        }
        if order.outcome.fuel_cost <= 0.0 {
            continue;
        }
        let Some(level) = traffic.get(&order.route_id).copied() else {
            continue;
        };
        match fuel.iter_mut().find(|(seen, _)| *seen == level) {
            Some((_, sum)) => *sum += order.outcome.fuel_cost,
            None => fuel.push((level, order.outcome.fuel_cost)),
        }
    }

    DashboardSummary {
        total_profit: round2(total_profit),
        efficiency_score: round2(percentage(on_time, orders.len())),
        total_orders: orders.len(),
        on_time_deliveries: on_time,
        late_deliveries: late,
        pending_orders: pending,
        delivery_status_data: vec![
            ChartEntry::new("On Time", on_time, COLOR_GREEN),
            ChartEntry::new("Late", late, COLOR_RED),
            ChartEntry::new("Pending", pending, COLOR_AMBER),
        ],
        fuel_cost_data: fuel
            .into_iter()
            .map(|(level, sum)| ChartEntry::new(level.as_str(), round2(sum), traffic_color(level)))
            .collect(),
    }
}
