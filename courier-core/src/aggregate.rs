//! Run-level KPIs folded from per-order and per-driver results.

use crate::economics::OrderEconomics;

/// Round to two decimal places, halves away from zero.
///
/// # Examples
/// ```
/// use courier_core::round2;
///
/// assert_eq!(round2(12.345_6), 12.35);
/// assert_eq!(round2(-0.004), -0.0);
/// ```
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage of `part` in `whole`, or zero when `whole` is zero.
pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// One row of `orderDetails` in a run result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct OrderDetail {
    /// External order code.
    pub order_id: String,
    /// Customer display name.
    pub customer_name: String,
    /// Order value.
    pub value: f64,
    /// Driver who delivered it.
    pub driver_name: String,
    /// Route it travelled.
    pub route_name: String,
    /// Whether it met the on-time tolerance.
    pub is_on_time: bool,
    /// Late penalty.
    pub penalty: f64,
    /// High-value bonus.
    pub bonus: f64,
    /// Fuel cost.
    pub fuel_cost: f64,
    /// Unrounded profit.
    pub profit: f64,
    /// Delivery time in whole minutes.
    pub delivery_time: u64,
}

/// One row of `driverUtilization` in a run result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct DriverSummary {
    /// Driver display name.
    pub driver_name: String,
    /// Hours worked, rounded to two decimals.
    pub hours_worked: f64,
    /// Orders delivered.
    pub deliveries: usize,
    /// Orders delivered on time.
    pub on_time_deliveries: usize,
    /// Profit earned, rounded to two decimals.
    pub profit: f64,
    /// On-time share of deliveries as a percentage, unrounded.
    pub efficiency: f64,
}

/// Outcome of one simulation run.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct RunResult {
    /// Orders delivered during the run.
    pub processed_orders: usize,
    /// Sum of order profit, rounded to two decimals.
    pub total_profit: f64,
    /// On-time share of processed orders as a percentage, rounded.
    pub efficiency_score: f64,
    /// Orders delivered on time.
    pub on_time_deliveries: usize,
    /// Orders delivered late.
    pub late_deliveries: usize,
    /// Sum of fuel cost, rounded to two decimals.
    pub total_fuel_cost: f64,
    /// One summary per selected driver, in selection order.
    pub driver_utilization: Vec<DriverSummary>,
    /// One row per processed order, in processing order.
    pub order_details: Vec<OrderDetail>,
}

/// Running totals for one driver's shift.
#[derive(Debug, Clone, Default)]
pub(crate) struct DriverTally {
    deliveries: usize,
    on_time: usize,
    profit: f64,
}

impl DriverTally {
    pub(crate) fn record(&mut self, economics: &OrderEconomics) {
        self.deliveries += 1;
        if economics.is_on_time {
            self.on_time += 1;
        }
        self.profit += economics.profit;
    }

    pub(crate) fn finish(self, driver_name: &str, hours_worked: f64) -> DriverSummary {
        DriverSummary {
            driver_name: driver_name.to_owned(),
            hours_worked: round2(hours_worked),
            deliveries: self.deliveries,
            on_time_deliveries: self.on_time,
            profit: round2(self.profit),
            efficiency: percentage(self.on_time, self.deliveries),
        }
    }
}

/// Accumulates a [`RunResult`] while a run progresses.
#[derive(Debug, Default)]
pub(crate) struct RunAggregator {
    result: RunResult,
}

impl RunAggregator {
    pub(crate) fn record_order(&mut self, detail: OrderDetail) {
        let result = &mut self.result;
        result.processed_orders += 1;
        result.total_profit += detail.profit;
        result.total_fuel_cost += detail.fuel_cost;
        if detail.is_on_time {
            result.on_time_deliveries += 1;
        } else {
            result.late_deliveries += 1;
        }
        result.order_details.push(detail);
    }

    pub(crate) fn record_driver(&mut self, summary: DriverSummary) {
        self.result.driver_utilization.push(summary);
    }

    /// Compute the efficiency score and round the money totals.
    pub(crate) fn finish(self) -> RunResult {
        let mut result = self.result;
        result.efficiency_score = round2(percentage(
            result.on_time_deliveries,
            result.processed_orders,
        ));
        result.total_profit = round2(result.total_profit);
        result.total_fuel_cost = round2(result.total_fuel_cost);
        result
    }
}
