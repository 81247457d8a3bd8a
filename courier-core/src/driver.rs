//! Drivers available to the allocation engine.
//!
//! A [`Driver`] is read-only input to a simulation run. Constructors validate
//! the shift and weekly hour ranges so downstream components can rely on
//! them.

use std::fmt;

use thiserror::Error;

/// Hours above which the weekly workload starts contributing to fatigue.
const FATIGUE_FLOOR_HOURS: f64 = 40.0;

/// Width of the band over which fatigue rises from 0 to 100.
const FATIGUE_BAND_HOURS: f64 = 40.0;

/// Identifier of a driver in the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct DriverId(pub u64);

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A delivery driver and their recent workload.
///
/// # Examples
/// ```
/// use courier_core::{Driver, DriverId};
///
/// # fn main() -> Result<(), courier_core::DriverError> {
/// let driver = Driver::new(DriverId(1), "Amit", 6.0, 60.0)?;
/// assert!(driver.is_active);
/// assert_eq!(driver.fatigue_level(), 50.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Driver {
    /// Store identity.
    pub id: DriverId,
    /// Display name, trimmed.
    pub name: String,
    /// Hours worked in the current shift, `0..=24`.
    pub current_shift_hours: f64,
    /// Hours worked over the trailing seven days, `0..=168`.
    #[cfg_attr(feature = "serde", serde(rename = "past7DayWorkHours"))]
    pub past_7_day_work_hours: f64,
    /// Only active drivers are eligible for selection.
    #[cfg_attr(feature = "serde", serde(default = "default_active"))]
    pub is_active: bool,
}

#[cfg(feature = "serde")]
const fn default_active() -> bool {
    true
}

/// Errors returned by [`Driver::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DriverError {
    /// The trimmed name was shorter than two characters.
    #[error("driver name must be at least 2 characters long")]
    NameTooShort,
    /// Shift hours fell outside `0..=24`.
    #[error("current shift hours must be between 0 and 24, got {0}")]
    ShiftHoursOutOfRange(f64),
    /// Weekly hours fell outside `0..=168`.
    #[error("past 7-day work hours must be between 0 and 168, got {0}")]
    WeeklyHoursOutOfRange(f64),
}

impl Driver {
    /// Validate and construct an active [`Driver`].
    pub fn new(
        id: DriverId,
        name: impl Into<String>,
        current_shift_hours: f64,
        past_7_day_work_hours: f64,
    ) -> Result<Self, DriverError> {
        let driver = Self {
            id,
            name: name.into().trim().to_owned(),
            current_shift_hours,
            past_7_day_work_hours,
            is_active: true,
        };
        driver.validate()?;
        Ok(driver)
    }

    /// Return the same driver with the active flag replaced.
    #[must_use]
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Check the invariants enforced by [`Driver::new`].
    ///
    /// Records decoded from a store or from JSON bypass the constructor, so
    /// callers re-check them here.
    pub fn validate(&self) -> Result<(), DriverError> {
        if self.name.trim().chars().count() < 2 {
            return Err(DriverError::NameTooShort);
        }
        if !(0.0..=24.0).contains(&self.current_shift_hours) {
            return Err(DriverError::ShiftHoursOutOfRange(self.current_shift_hours));
        }
        if !(0.0..=168.0).contains(&self.past_7_day_work_hours) {
            return Err(DriverError::WeeklyHoursOutOfRange(
                self.past_7_day_work_hours,
            ));
        }
        Ok(())
    }

    /// Display-only fatigue score in `0.0..=100.0`.
    ///
    /// Zero at or below 40 weekly hours, rising linearly to 100 at 80 hours.
    /// The simulation keys off [`Driver::past_7_day_work_hours`] directly and
    /// never reads this value.
    #[must_use]
    pub fn fatigue_level(&self) -> f64 {
        let raw = (self.past_7_day_work_hours - FATIGUE_FLOOR_HOURS) / FATIGUE_BAND_HOURS * 100.0;
        raw.clamp(0.0, 100.0)
    }
}
