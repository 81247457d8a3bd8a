//! Delivery timing and per-driver simulated clocks.
//!
//! A driver's fatigue multiplier is fixed once per run. Fatigued drivers run
//! at 70% "speed", which divides the nominal time by 0.7 and so makes their
//! deliveries take longer.

use chrono::{NaiveDateTime, TimeDelta};

use crate::Driver;

/// Weekly hours above which a driver counts as fatigued.
pub const FATIGUE_THRESHOLD_HOURS: f64 = 56.0;

/// Speed factor applied to fatigued drivers.
pub const FATIGUED_SPEED_MULTIPLIER: f64 = 0.7;

const MILLIS_PER_MINUTE: f64 = 60_000.0;
const MAX_DELTA_MILLIS: f64 = 9.0e18;

/// Speed factor applied to a driver's deliveries for a whole run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FatigueMultiplier(f64);

impl FatigueMultiplier {
    /// Multiplier for a rested driver.
    pub const RESTED: Self = Self(1.0);
    /// Multiplier for a fatigued driver.
    pub const FATIGUED: Self = Self(FATIGUED_SPEED_MULTIPLIER);

    /// Derive the multiplier from the driver's trailing weekly hours.
    ///
    /// # Examples
    /// ```
    /// use courier_core::{Driver, DriverId, FatigueMultiplier};
    ///
    /// let rested = Driver::new(DriverId(1), "Asha", 0.0, 56.0).unwrap();
    /// let tired = Driver::new(DriverId(2), "Ravi", 0.0, 56.5).unwrap();
    /// assert_eq!(FatigueMultiplier::for_driver(&rested), FatigueMultiplier::RESTED);
    /// assert_eq!(FatigueMultiplier::for_driver(&tired), FatigueMultiplier::FATIGUED);
    /// ```
    #[must_use]
    pub fn for_driver(driver: &Driver) -> Self {
        if driver.past_7_day_work_hours > FATIGUE_THRESHOLD_HOURS {
            Self::FATIGUED
        } else {
            Self::RESTED
        }
    }

    /// Raw factor.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Minutes a delivery takes on a route with the given nominal time.
    #[must_use]
    pub fn delivery_minutes(self, base_time_minutes: f64) -> f64 {
        if self.0 < 1.0 {
            base_time_minutes / self.0
        } else {
            base_time_minutes
        }
    }
}

/// A driver's simulated wall clock and hours worked so far.
///
/// Clocks are values: [`DriverClock::advance`] consumes the clock and hands
/// back its successor, so no timeline is shared between drivers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverClock {
    now: NaiveDateTime,
    hours_worked: f64,
}

impl DriverClock {
    /// Start a clock at the shift start with no hours worked.
    #[must_use]
    pub const fn start(at: NaiveDateTime) -> Self {
        Self {
            now: at,
            hours_worked: 0.0,
        }
    }

    /// Current simulated instant.
    #[must_use]
    pub const fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Hours worked since the shift started.
    #[must_use]
    pub const fn hours_worked(&self) -> f64 {
        self.hours_worked
    }

    /// Whether the driver may take another order under `max_hours`.
    ///
    /// The check happens before an order starts, so the final delivery may
    /// push the total past the budget.
    #[must_use]
    pub fn has_capacity(&self, max_hours: f64) -> bool {
        self.hours_worked < max_hours
    }

    /// Spend `minutes` on a delivery.
    ///
    /// Returns the advanced clock and the instant the delivery completed, or
    /// `None` when `minutes` is not finite or the completion instant falls
    /// outside the calendar chrono can represent.
    #[must_use]
    pub fn advance(self, minutes: f64) -> Option<(Self, NaiveDateTime)> {
        let completed = self.now.checked_add_signed(minutes_to_delta(minutes)?)?;
        let next = Self {
            now: completed,
            hours_worked: self.hours_worked + minutes / 60.0,
        };
        Some((next, completed))
    }
}

fn minutes_to_delta(minutes: f64) -> Option<TimeDelta> {
    let millis = (minutes * MILLIS_PER_MINUTE).round();
    // Bounded below i64::MAX so the cast cannot saturate.
    if !millis.is_finite() || millis.abs() >= MAX_DELTA_MILLIS {
        return None;
    }
    TimeDelta::try_milliseconds(millis as i64)
}
