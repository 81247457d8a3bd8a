//! Choosing which drivers take part in a run.

use std::num::NonZeroUsize;

use crate::{Driver, SimulationError};

/// Select `requested` active drivers from `drivers`.
///
/// Active drivers are ordered by ascending id and the first `requested` are
/// taken, so the same pool always yields the same selection. Inactive
/// drivers are ignored.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use courier_core::{Driver, DriverId, select_drivers};
///
/// let pool = vec![
///     Driver::new(DriverId(7), "Ravi", 0.0, 10.0).unwrap(),
///     Driver::new(DriverId(2), "Asha", 0.0, 10.0).unwrap(),
///     Driver::new(DriverId(5), "Meera", 0.0, 10.0).unwrap().with_active(false),
/// ];
/// let chosen = select_drivers(&pool, NonZeroUsize::new(1).unwrap()).unwrap();
/// assert_eq!(chosen[0].id, DriverId(2));
/// ```
pub fn select_drivers(
    drivers: &[Driver],
    requested: NonZeroUsize,
) -> Result<Vec<Driver>, SimulationError> {
    let mut active: Vec<&Driver> = drivers.iter().filter(|driver| driver.is_active).collect();
    if active.len() < requested.get() {
        return Err(SimulationError::InsufficientDrivers {
            requested: requested.get(),
            available: active.len(),
        });
    }
    active.sort_by_key(|driver| driver.id);
    Ok(active
        .into_iter()
        .take(requested.get())
        .cloned()
        .collect())
}
