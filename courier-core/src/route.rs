//! Delivery routes with fixed distance and nominal duration.
//!
//! The engine does no route planning: distance and base time are given.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Shortest route the store accepts, in kilometres.
pub const MIN_DISTANCE_KM: f64 = 0.1;

/// Shortest nominal delivery time the store accepts, in minutes.
pub const MIN_BASE_TIME_MINUTES: f64 = 1.0;

/// Longest nominal delivery time the store accepts, in minutes: one full day.
pub const MAX_BASE_TIME_MINUTES: f64 = 24.0 * 60.0;

/// Identifier of a route in the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct RouteId(pub u64);

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Congestion band of a route.
///
/// # Examples
/// ```
/// use courier_core::TrafficLevel;
///
/// let level: TrafficLevel = "High".parse().unwrap();
/// assert_eq!(level, TrafficLevel::High);
/// assert_eq!(level.to_string(), "High");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrafficLevel {
    /// Free-flowing traffic.
    Low,
    /// Moderate congestion.
    #[default]
    Medium,
    /// Heavy congestion; incurs a fuel surcharge.
    High,
}

impl TrafficLevel {
    /// Name used on the wire and in the store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for TrafficLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown traffic level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown traffic level {0:?}; expected Low, Medium or High")]
pub struct ParseTrafficLevelError(pub String);

impl FromStr for TrafficLevel {
    type Err = ParseTrafficLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Self::Low),
            "Medium" => Ok(Self::Medium),
            "High" => Ok(Self::High),
            other => Err(ParseTrafficLevelError(other.to_owned())),
        }
    }
}

/// A route an order is delivered along.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Route {
    /// Store identity.
    pub id: RouteId,
    /// External route code, e.g. `"R7"`.
    pub route_code: String,
    /// Display name.
    pub name: String,
    /// Length in kilometres.
    #[cfg_attr(feature = "serde", serde(rename = "distance"))]
    pub distance_km: f64,
    /// Congestion band.
    pub traffic_level: TrafficLevel,
    /// Nominal delivery duration at normal speed, in minutes.
    #[cfg_attr(feature = "serde", serde(rename = "baseTime"))]
    pub base_time_minutes: f64,
    /// Inactive routes are kept for history.
    #[cfg_attr(feature = "serde", serde(default = "default_active"))]
    pub is_active: bool,
}

#[cfg(feature = "serde")]
const fn default_active() -> bool {
    true
}

/// Errors returned by [`Route::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// The route code was blank.
    #[error("route code is required")]
    MissingCode,
    /// The route name was blank.
    #[error("route name is required")]
    MissingName,
    /// Distance was below [`MIN_DISTANCE_KM`].
    #[error("distance must be at least {MIN_DISTANCE_KM} km, got {0}")]
    DistanceTooShort(f64),
    /// Distance was infinite.
    #[error("distance must be finite, got {0}")]
    DistanceNotFinite(f64),
    /// Base time was below [`MIN_BASE_TIME_MINUTES`].
    #[error("base time must be at least {MIN_BASE_TIME_MINUTES} minute, got {0}")]
    BaseTimeTooShort(f64),
    /// Base time exceeded [`MAX_BASE_TIME_MINUTES`].
    #[error("base time must be at most {MAX_BASE_TIME_MINUTES} minutes, got {0}")]
    BaseTimeTooLong(f64),
}

impl Route {
    /// Validate and construct an active [`Route`].
    ///
    /// # Examples
    /// ```
    /// use courier_core::{Route, RouteId, TrafficLevel};
    ///
    /// let route = Route::new(RouteId(1), "R1", "Ring Road", 12.5, TrafficLevel::Low, 30.0)
    ///     .unwrap();
    /// assert_eq!(route.base_time_minutes, 30.0);
    /// ```
    pub fn new(
        id: RouteId,
        route_code: impl Into<String>,
        name: impl Into<String>,
        distance_km: f64,
        traffic_level: TrafficLevel,
        base_time_minutes: f64,
    ) -> Result<Self, RouteError> {
        let route = Self {
            id,
            route_code: route_code.into().trim().to_owned(),
            name: name.into().trim().to_owned(),
            distance_km,
            traffic_level,
            base_time_minutes,
            is_active: true,
        };
        route.validate()?;
        Ok(route)
    }

    /// Check the invariants enforced by [`Route::new`].
    pub fn validate(&self) -> Result<(), RouteError> {
        if self.route_code.trim().is_empty() {
            return Err(RouteError::MissingCode);
        }
        if self.name.trim().is_empty() {
            return Err(RouteError::MissingName);
        }
        // Written as negated comparisons so NaN is rejected too.
        if !(self.distance_km >= MIN_DISTANCE_KM) {
            return Err(RouteError::DistanceTooShort(self.distance_km));
        }
        if !self.distance_km.is_finite() {
            return Err(RouteError::DistanceNotFinite(self.distance_km));
        }
        if !(self.base_time_minutes >= MIN_BASE_TIME_MINUTES) {
            return Err(RouteError::BaseTimeTooShort(self.base_time_minutes));
        }
        if !(self.base_time_minutes <= MAX_BASE_TIME_MINUTES) {
            return Err(RouteError::BaseTimeTooLong(self.base_time_minutes));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Low", TrafficLevel::Low)]
    #[case("Medium", TrafficLevel::Medium)]
    #[case("High", TrafficLevel::High)]
    fn traffic_level_parses_canonical_names(#[case] raw: &str, #[case] expected: TrafficLevel) {
        assert_eq!(raw.parse::<TrafficLevel>(), Ok(expected));
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    #[case("high")]
    #[case("")]
    #[case("Severe")]
    fn traffic_level_rejects_other_spellings(#[case] raw: &str) {
        assert!(raw.parse::<TrafficLevel>().is_err());
    }

    #[rstest]
    fn route_accepts_minimum_bounds() {
        let route = Route::new(RouteId(1), "R1", "Lane", 0.1, TrafficLevel::Medium, 1.0);
        assert!(route.is_ok());
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.05)]
    #[case(f64::NAN)]
    fn route_rejects_short_distance(#[case] distance: f64) {
        let err = Route::new(RouteId(1), "R1", "Lane", distance, TrafficLevel::Low, 10.0)
            .expect_err("distance too short");
        assert!(matches!(err, RouteError::DistanceTooShort(_)));
    }

    #[rstest]
    fn route_rejects_short_base_time() {
        let err = Route::new(RouteId(1), "R1", "Lane", 5.0, TrafficLevel::Low, 0.5)
            .expect_err("base time too short");
        assert_eq!(err, RouteError::BaseTimeTooShort(0.5));
    }

    #[rstest]
    fn route_accepts_maximum_base_time() {
        let route = Route::new(RouteId(1), "R1", "Lane", 5.0, TrafficLevel::Low, 1440.0);
        assert!(route.is_ok());
    }

    #[rstest]
    #[case(1440.5)]
    #[case(1e12)]
    #[case(f64::INFINITY)]
    fn route_rejects_long_base_time(#[case] base_time: f64) {
        let err = Route::new(RouteId(1), "R1", "Lane", 5.0, TrafficLevel::Low, base_time)
            .expect_err("base time too long");
        assert_eq!(err, RouteError::BaseTimeTooLong(base_time));
    }

    #[rstest]
    fn route_rejects_infinite_distance() {
        let err = Route::new(RouteId(1), "R1", "Lane", f64::INFINITY, TrafficLevel::Low, 10.0)
            .expect_err("distance not finite");
        assert_eq!(err, RouteError::DistanceNotFinite(f64::INFINITY));
    }

    #[rstest]
    fn route_requires_code_and_name() {
        assert_eq!(
            Route::new(RouteId(1), " ", "Lane", 5.0, TrafficLevel::Low, 5.0),
            Err(RouteError::MissingCode)
        );
        assert_eq!(
            Route::new(RouteId(1), "R1", "", 5.0, TrafficLevel::Low, 5.0),
            Err(RouteError::MissingName)
        );
    }
}
