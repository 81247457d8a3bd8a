//! Static partitioning of the pending backlog across drivers.
//!
//! The split is count-based: it ignores distance, value and deadlines.

use crate::SimulationError;

/// Number of orders each driver receives, `ceil(total / drivers)`.
///
/// Returns zero when either side is empty.
#[must_use]
pub const fn chunk_size(total_orders: usize, drivers: usize) -> usize {
    if drivers == 0 {
        return 0;
    }
    total_orders.div_ceil(drivers)
}

/// Split `orders` into one contiguous block per driver.
///
/// Driver `i` receives `orders[i * chunk .. (i + 1) * chunk]`, clipped to the
/// end of the backlog. The result always has `drivers` entries; when there
/// are more drivers than orders the trailing blocks are empty. Input order
/// is preserved.
///
/// # Examples
/// ```
/// use courier_core::allocate;
///
/// let backlog = [1, 2, 3, 4, 5];
/// let blocks = allocate(&backlog, 3).unwrap();
/// assert_eq!(blocks, vec![&[1, 2][..], &[3, 4][..], &[5][..]]);
/// ```
pub fn allocate<T>(orders: &[T], drivers: usize) -> Result<Vec<&[T]>, SimulationError> {
    if orders.is_empty() {
        return Err(SimulationError::NoPendingOrders);
    }
    let size = chunk_size(orders.len(), drivers);
    let mut blocks: Vec<&[T]> = if size == 0 {
        Vec::new()
    } else {
        orders.chunks(size).collect()
    };
    blocks.resize(drivers, &[]);
    Ok(blocks)
}
