//! Simulation parameters and their validation.
//!
//! Callers build a [`SimulationRequest`] from whatever boundary they sit on
//! (JSON body, CLI flags) and call [`SimulationRequest::validate`] before any
//! store access. Validation is pure: the same input always produces the same
//! result.

use std::{fmt, num::NonZeroUsize, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// Field name of the driver count, as reported in errors.
pub const FIELD_AVAILABLE_DRIVERS: &str = "availableDrivers";
/// Field name of the start time, as reported in errors.
pub const FIELD_ROUTE_START_TIME: &str = "routeStartTime";
/// Field name of the hour budget, as reported in errors.
pub const FIELD_MAX_HOURS_PER_DRIVER: &str = "maxHoursPerDriver";

/// Upper bound of the per-driver hour budget.
pub const MAX_HOURS_LIMIT: f64 = 24.0;

/// Raw, unvalidated simulation input.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use courier_core::SimulationRequest;
///
/// let request = SimulationRequest {
///     available_drivers: Some(2),
///     route_start_time: Some("09:00".into()),
///     max_hours_per_driver: Some(8.0),
/// };
/// let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
/// let params = request.validate(date).unwrap();
/// assert_eq!(params.available_drivers.get(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct SimulationRequest {
    /// Number of drivers to allocate orders to.
    #[cfg_attr(feature = "serde", serde(default))]
    pub available_drivers: Option<i64>,
    /// Shift start as `HH:MM` on a 24-hour clock.
    #[cfg_attr(feature = "serde", serde(default))]
    pub route_start_time: Option<String>,
    /// Per-driver hour budget in `(0, 24]`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_hours_per_driver: Option<f64>,
}

/// Why a [`SimulationRequest`] was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationReason {
    /// The field was absent.
    #[error("is required")]
    Missing,
    /// The driver count was zero or negative.
    #[error("must be greater than 0, got {0}")]
    NotPositive(i64),
    /// The driver count does not fit in memory indices.
    #[error("is too large, got {0}")]
    TooLarge(i64),
    /// The hour budget fell outside `(0, 24]`.
    #[error("must be greater than 0 and at most 24, got {0}")]
    HoursOutOfRange(String),
    /// The start time did not match `HH:MM`.
    #[error("must use 24-hour HH:MM format (e.g. 09:30), got {0:?}")]
    BadTimeFormat(String),
}

/// A caller-correctable problem with simulation input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    /// Offending field, in wire spelling.
    pub field: &'static str,
    /// What was wrong with it.
    pub reason: ValidationReason,
}

impl ValidationError {
    const fn new(field: &'static str, reason: ValidationReason) -> Self {
        Self { field, reason }
    }
}

/// Wall-clock shift start parsed from `HH:MM`.
///
/// The hour may omit its leading zero (`"9:30"`); minutes always have two
/// digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StartTime(NaiveTime);

impl StartTime {
    /// The start as a time of day.
    #[must_use]
    pub const fn time(self) -> NaiveTime {
        self.0
    }

    /// Anchor the start time on a calendar date.
    #[must_use]
    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        NaiveDateTime::new(date, self.0)
    }
}

impl fmt::Display for StartTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for StartTime {
    type Err = ValidationReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ValidationReason::BadTimeFormat(s.to_owned());
        let (hours, minutes) = s.split_once(':').ok_or_else(bad)?;
        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(hours) || hours.len() > 2 || !all_digits(minutes) || minutes.len() != 2 {
            return Err(bad());
        }
        let hour: u32 = hours.parse().map_err(|_| bad())?;
        let minute: u32 = minutes.parse().map_err(|_| bad())?;
        if hour > 23 || minute > 59 {
            return Err(bad());
        }
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(bad)
    }
}

/// Validated simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    /// Number of drivers to select.
    pub available_drivers: NonZeroUsize,
    /// Shift start shared by every driver's clock.
    pub route_start: StartTime,
    /// Hour budget per driver, in `(0, 24]`.
    pub max_hours_per_driver: f64,
    /// Calendar date the simulated clocks run on.
    pub run_date: NaiveDate,
}

impl SimulationParams {
    /// Instant every driver's clock starts at.
    #[must_use]
    pub fn shift_start(&self) -> NaiveDateTime {
        self.route_start.on(self.run_date)
    }
}

impl SimulationRequest {
    /// Check the request and convert it into [`SimulationParams`].
    ///
    /// Missing fields are reported first, in declaration order, then the
    /// driver count, the hour budget and finally the start time format.
    pub fn validate(&self, run_date: NaiveDate) -> Result<SimulationParams, ValidationError> {
        let drivers = self.available_drivers.ok_or(ValidationError::new(
            FIELD_AVAILABLE_DRIVERS,
            ValidationReason::Missing,
        ))?;
        let start = self
            .route_start_time
            .as_deref()
            .ok_or(ValidationError::new(
                FIELD_ROUTE_START_TIME,
                ValidationReason::Missing,
            ))?;
        let max_hours = self.max_hours_per_driver.ok_or(ValidationError::new(
            FIELD_MAX_HOURS_PER_DRIVER,
            ValidationReason::Missing,
        ))?;

        let available_drivers = validate_driver_count(drivers)?;
        let max_hours_per_driver = validate_max_hours(max_hours)?;
        let route_start = start
            .parse::<StartTime>()
            .map_err(|reason| ValidationError::new(FIELD_ROUTE_START_TIME, reason))?;

        Ok(SimulationParams {
            available_drivers,
            route_start,
            max_hours_per_driver,
            run_date,
        })
    }
}

fn validate_driver_count(drivers: i64) -> Result<NonZeroUsize, ValidationError> {
    if drivers <= 0 {
        return Err(ValidationError::new(
            FIELD_AVAILABLE_DRIVERS,
            ValidationReason::NotPositive(drivers),
        ));
    }
    usize::try_from(drivers)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or(ValidationError::new(
            FIELD_AVAILABLE_DRIVERS,
            ValidationReason::TooLarge(drivers),
        ))
}

fn validate_max_hours(hours: f64) -> Result<f64, ValidationError> {
    if hours > 0.0 && hours <= MAX_HOURS_LIMIT {
        Ok(hours)
    } else {
        Err(ValidationError::new(
            FIELD_MAX_HOURS_PER_DRIVER,
            ValidationReason::HoursOutOfRange(hours.to_string()),
        ))
    }
}
