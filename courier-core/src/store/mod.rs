//! Record store boundary for drivers, routes and orders.
//!
//! The `DeliveryStore` trait is the only way the engine reaches persisted
//! records. Reads return owned snapshots; writes happen once per run through
//! [`DeliveryStore::apply_updates`].

use crate::{Driver, Order, OrderId, OrderUpdate, Route};

#[cfg(feature = "store-sqlite")]
mod schema;
#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use schema::{SCHEMA_VERSION, SchemaError, initialise_schema};
#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteDeliveryStore, SqliteStoreError};

/// Orders written by a successful [`DeliveryStore::apply_updates`] call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct UpdateReport {
    /// Identifiers of the updated orders, in the order they were applied.
    pub updated: Vec<OrderId>,
}

impl UpdateReport {
    /// Number of orders written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.updated.len()
    }

    /// Whether nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updated.is_empty()
    }
}

/// Access to persisted drivers, routes and orders.
///
/// Implementations must apply a batch of updates atomically: either every
/// update lands and the report lists them all, or an error is returned and
/// no order changes.
///
/// # Examples
///
/// ```rust
/// use std::convert::Infallible;
/// use courier_core::{DeliveryStore, Driver, Order, OrderUpdate, Route, UpdateReport};
///
/// #[derive(Default)]
/// struct Empty;
///
/// impl DeliveryStore for Empty {
///     type Error = Infallible;
///
///     fn active_drivers(&self) -> Result<Vec<Driver>, Self::Error> { Ok(Vec::new()) }
///     fn routes(&self) -> Result<Vec<Route>, Self::Error> { Ok(Vec::new()) }
///     fn pending_orders(&self) -> Result<Vec<Order>, Self::Error> { Ok(Vec::new()) }
///     fn all_orders(&self) -> Result<Vec<Order>, Self::Error> { Ok(Vec::new()) }
///     fn apply_updates(&mut self, updates: &[OrderUpdate]) -> Result<UpdateReport, Self::Error> {
///         Ok(UpdateReport { updated: updates.iter().map(|u| u.order_id).collect() })
///     }
/// }
///
/// let mut store = Empty;
/// assert!(store.pending_orders().unwrap().is_empty());
/// assert!(store.apply_updates(&[]).unwrap().is_empty());
/// ```
pub trait DeliveryStore {
    /// Failure raised by the backing store.
    type Error: std::error::Error + 'static;

    /// Return every driver with `is_active` set.
    fn active_drivers(&self) -> Result<Vec<Driver>, Self::Error>;

    /// Return every route.
    fn routes(&self) -> Result<Vec<Route>, Self::Error>;

    /// Return pending orders in insertion order.
    fn pending_orders(&self) -> Result<Vec<Order>, Self::Error>;

    /// Return every order regardless of status.
    fn all_orders(&self) -> Result<Vec<Order>, Self::Error>;

    /// Persist the outcome of a run, all or nothing.
    fn apply_updates(&mut self, updates: &[OrderUpdate]) -> Result<UpdateReport, Self::Error>;
}
