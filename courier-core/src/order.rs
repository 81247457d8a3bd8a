//! Customer orders and the outcome fields the engine fills in.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

use crate::{DriverId, RouteId};

/// Identifier of an order in the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of an order.
///
/// Only [`OrderStatus::Pending`] orders enter a run; processed orders leave
/// as [`OrderStatus::Delivered`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum OrderStatus {
    /// Waiting for allocation.
    #[default]
    Pending,
    /// Out for delivery.
    InTransit,
    /// Delivered by a simulation run.
    Delivered,
    /// Withdrawn by the customer.
    Cancelled,
}

impl OrderStatus {
    /// Name used on the wire and in the store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InTransit => "in-transit",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown order status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status {0:?}")]
pub struct ParseOrderStatusError(pub String);

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in-transit" => Ok(Self::InTransit),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ParseOrderStatusError(other.to_owned())),
        }
    }
}

/// Engine-computed fields of an order.
///
/// `is_on_time` stays `None` until the order has been processed.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct DeliveryOutcome {
    /// Whether the delivery met the on-time tolerance.
    pub is_on_time: Option<bool>,
    /// Late-delivery penalty.
    pub penalty: f64,
    /// High-value on-time bonus.
    pub bonus: f64,
    /// Fuel spent on the route.
    pub fuel_cost: f64,
    /// `value + bonus - penalty - fuel_cost`.
    pub profit: f64,
    /// Simulated wall-clock instant the delivery completed.
    pub actual_delivery_time: Option<NaiveDateTime>,
}

/// A customer order awaiting or past delivery.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Order {
    /// Store identity.
    pub id: OrderId,
    /// External order code, reported as `orderId` in run output.
    pub order_code: String,
    /// Customer display name.
    pub customer_name: String,
    /// Order value in currency units.
    pub value: f64,
    /// Route the order travels along.
    #[cfg_attr(feature = "serde", serde(rename = "assignedRoute"))]
    pub route_id: RouteId,
    /// Driver the order was allocated to, once processed.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "assignedDriver", default, skip_serializing_if = "Option::is_none")
    )]
    pub driver_id: Option<DriverId>,
    /// Externally scheduled delivery slot.
    ///
    /// Carried for completeness; punctuality is judged against the route's
    /// nominal time, never against this field.
    pub delivery_timestamp: DateTime<Utc>,
    /// Lifecycle state.
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: OrderStatus,
    /// Engine-computed fields.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub outcome: DeliveryOutcome,
}

/// Errors returned by [`Order::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderError {
    /// The order code was blank.
    #[error("order code is required")]
    MissingCode,
    /// The customer name was blank.
    #[error("customer name is required")]
    MissingCustomer,
    /// The value was negative or not a number.
    #[error("order value cannot be negative, got {0}")]
    NegativeValue(f64),
}

impl Order {
    /// Validate and construct a pending [`Order`].
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use courier_core::{Order, OrderId, OrderStatus, RouteId};
    ///
    /// let due = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    /// let order = Order::new(OrderId(1), "ORD1", "Priya", 750.0, RouteId(3), due).unwrap();
    /// assert_eq!(order.status, OrderStatus::Pending);
    /// assert_eq!(order.outcome.is_on_time, None);
    /// ```
    pub fn new(
        id: OrderId,
        order_code: impl Into<String>,
        customer_name: impl Into<String>,
        value: f64,
        route_id: RouteId,
        delivery_timestamp: DateTime<Utc>,
    ) -> Result<Self, OrderError> {
        let order = Self {
            id,
            order_code: order_code.into().trim().to_owned(),
            customer_name: customer_name.into().trim().to_owned(),
            value,
            route_id,
            driver_id: None,
            delivery_timestamp,
            status: OrderStatus::Pending,
            outcome: DeliveryOutcome::default(),
        };
        order.validate()?;
        Ok(order)
    }

    /// Check the invariants enforced by [`Order::new`].
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.order_code.trim().is_empty() {
            return Err(OrderError::MissingCode);
        }
        if self.customer_name.trim().is_empty() {
            return Err(OrderError::MissingCustomer);
        }
        if !(self.value >= 0.0) {
            return Err(OrderError::NegativeValue(self.value));
        }
        Ok(())
    }

    /// Return the order with an explicit status.
    #[must_use]
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// Apply a write-back record produced by a run.
    pub fn apply(&mut self, update: &OrderUpdate) {
        self.driver_id = Some(update.driver_id);
        self.status = update.status;
        self.outcome = update.outcome.clone();
    }
}

/// Fields a run writes back for one processed order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct OrderUpdate {
    /// Order being updated.
    pub order_id: OrderId,
    /// Driver the order was allocated to.
    pub driver_id: DriverId,
    /// New lifecycle state, always [`OrderStatus::Delivered`] for a run.
    pub status: OrderStatus,
    /// Computed economics and delivery instant.
    pub outcome: DeliveryOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn due() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    #[case("pending", OrderStatus::Pending)]
    #[case("in-transit", OrderStatus::InTransit)]
    #[case("delivered", OrderStatus::Delivered)]
    #[case("cancelled", OrderStatus::Cancelled)]
    fn status_round_trips_through_str(#[case] raw: &str, #[case] status: OrderStatus) {
        assert_eq!(raw.parse::<OrderStatus>(), Ok(status));
        assert_eq!(status.to_string(), raw);
    }

    #[rstest]
    fn status_rejects_unknown_value() {
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[rstest]
    fn new_order_is_pending_without_outcome(due: DateTime<Utc>) {
        let order = Order::new(OrderId(1), "ORD1", "Kiran", 0.0, RouteId(2), due)
            .expect("valid order");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.outcome, DeliveryOutcome::default());
        assert!(order.driver_id.is_none());
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    fn negative_value_is_rejected(due: DateTime<Utc>, #[case] value: f64) {
        let err = Order::new(OrderId(1), "ORD1", "Kiran", value, RouteId(2), due)
            .expect_err("invalid value");
        assert!(matches!(err, OrderError::NegativeValue(_)));
    }

    #[rstest]
    fn blank_fields_are_rejected(due: DateTime<Utc>) {
        assert_eq!(
            Order::new(OrderId(1), "", "Kiran", 1.0, RouteId(2), due),
            Err(OrderError::MissingCode)
        );
        assert_eq!(
            Order::new(OrderId(1), "ORD1", "  ", 1.0, RouteId(2), due),
            Err(OrderError::MissingCustomer)
        );
    }

    #[rstest]
    fn apply_copies_update_fields(due: DateTime<Utc>) {
        let mut order = Order::new(OrderId(4), "ORD4", "Kiran", 10.0, RouteId(2), due)
            .expect("valid order");
        let update = OrderUpdate {
            order_id: OrderId(4),
            driver_id: DriverId(8),
            status: OrderStatus::Delivered,
            outcome: DeliveryOutcome {
                is_on_time: Some(true),
                profit: 5.0,
                fuel_cost: 5.0,
                ..DeliveryOutcome::default()
            },
        };
        order.apply(&update);
        assert_eq!(order.driver_id, Some(DriverId(8)));
        assert_eq!(order.status, OrderStatus::Delivered);
        assert_eq!(order.outcome.is_on_time, Some(true));
    }
}
