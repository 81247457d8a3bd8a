//! SQLite-backed delivery record store.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use log::debug;
use rusqlite::{Connection, Row, Transaction};
use thiserror::Error;

use crate::{
    DeliveryOutcome, Driver, DriverId, Order, OrderId, OrderStatus, OrderUpdate, Route, RouteId,
    TrafficLevel,
};

use super::{
    DeliveryStore, UpdateReport,
    schema::{SchemaError, initialise_schema},
};

const SELECT_ORDERS: &str = "SELECT id, order_code, customer_name, value, route_id, driver_id,
        delivery_timestamp, status, is_on_time, penalty, bonus, fuel_cost, profit,
        actual_delivery_time
    FROM orders";

/// Error raised by [`SqliteDeliveryStore`].
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Creating or checking the schema failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// A read or insert statement failed.
    #[error("SQLite operation '{operation}' failed: {source}")]
    Sqlite {
        /// What the store was doing.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Writing a run result back failed; the whole batch was rolled back.
    #[error("failed to update order {order_id}; no orders were updated: {source}")]
    UpdateOrder {
        /// Order whose write failed.
        order_id: OrderId,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// An update named an order the database does not hold.
    #[error("order {order_id} does not exist; no orders were updated")]
    MissingOrder {
        /// Order that was not found.
        order_id: OrderId,
    },
    /// A stored enum column held an unrecognised value.
    #[error("{table} row {id} has invalid {column} {value:?}")]
    InvalidValue {
        /// Table holding the row.
        table: &'static str,
        /// Row identifier.
        id: u64,
        /// Column holding the value.
        column: &'static str,
        /// The raw stored value.
        value: String,
    },
}

fn sqlite(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> SqliteStoreError {
    move |source| SqliteStoreError::Sqlite { operation, source }
}

/// Delivery records persisted in a single SQLite database.
pub struct SqliteDeliveryStore {
    connection: Connection,
}

impl fmt::Debug for SqliteDeliveryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteDeliveryStore")
            .field("path", &self.connection.path())
            .finish_non_exhaustive()
    }
}

impl SqliteDeliveryStore {
    /// Open, creating if needed, the database at `path` and initialise its
    /// schema.
    pub fn open<P>(path: P) -> Result<Self, SqliteStoreError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let connection =
            Connection::open(path).map_err(|source| SqliteStoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_connection(connection)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, SqliteStoreError> {
        let connection =
            Connection::open_in_memory().map_err(|source| SqliteStoreError::OpenDatabase {
                path: PathBuf::from(":memory:"),
                source,
            })?;
        Self::from_connection(connection)
    }

    fn from_connection(mut connection: Connection) -> Result<Self, SqliteStoreError> {
        initialise_schema(&mut connection)?;
        Ok(Self { connection })
    }

    /// Insert a driver.
    pub fn insert_driver(&mut self, driver: &Driver) -> Result<(), SqliteStoreError> {
        write_driver(&self.connection, driver)
    }

    /// Insert a route.
    pub fn insert_route(&mut self, route: &Route) -> Result<(), SqliteStoreError> {
        write_route(&self.connection, route)
    }

    /// Insert an order with whatever status and outcome it carries.
    pub fn insert_order(&mut self, order: &Order) -> Result<(), SqliteStoreError> {
        write_order(&self.connection, order)
    }

    /// Insert a whole dataset in one transaction.
    ///
    /// Nothing is written when any record fails to insert.
    pub fn import(
        &mut self,
        drivers: &[Driver],
        routes: &[Route],
        orders: &[Order],
    ) -> Result<(), SqliteStoreError> {
        let transaction = self
            .connection
            .transaction()
            .map_err(sqlite("begin import transaction"))?;
        for driver in drivers {
            write_driver(&transaction, driver)?;
        }
        for route in routes {
            write_route(&transaction, route)?;
        }
        for order in orders {
            write_order(&transaction, order)?;
        }
        transaction
            .commit()
            .map_err(sqlite("commit import transaction"))?;
        debug!(
            "imported {} drivers, {} routes and {} orders",
            drivers.len(),
            routes.len(),
            orders.len()
        );
        Ok(())
    }

    fn read_orders(&self, filter: &str) -> Result<Vec<Order>, SqliteStoreError> {
        let query = format!("{SELECT_ORDERS} {filter} ORDER BY id");
        let mut statement = self
            .connection
            .prepare_cached(&query)
            .map_err(sqlite("prepare order query"))?;
        let rows = statement
            .query_map([], OrderRow::from_row)
            .map_err(sqlite("query orders"))?;
        rows.map(|row| row.map_err(sqlite("read order row"))?.into_order())
            .collect()
    }
}

fn write_driver(connection: &Connection, driver: &Driver) -> Result<(), SqliteStoreError> {
    connection
        .prepare_cached(
            "INSERT INTO drivers (id, name, current_shift_hours, past_7_day_work_hours, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .map_err(sqlite("prepare insert driver"))?
        .execute((
            driver.id.0,
            driver.name.as_str(),
            driver.current_shift_hours,
            driver.past_7_day_work_hours,
            driver.is_active,
        ))
        .map(|_| ())
        .map_err(sqlite("insert driver"))
}

fn write_route(connection: &Connection, route: &Route) -> Result<(), SqliteStoreError> {
    connection
        .prepare_cached(
            "INSERT INTO routes (
                id, route_code, name, distance_km, traffic_level, base_time_minutes, is_active
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .map_err(sqlite("prepare insert route"))?
        .execute((
            route.id.0,
            route.route_code.as_str(),
            route.name.as_str(),
            route.distance_km,
            route.traffic_level.as_str(),
            route.base_time_minutes,
            route.is_active,
        ))
        .map(|_| ())
        .map_err(sqlite("insert route"))
}

fn write_order(connection: &Connection, order: &Order) -> Result<(), SqliteStoreError> {
    let outcome = &order.outcome;
    connection
        .prepare_cached(
            "INSERT INTO orders (
                id, order_code, customer_name, value, route_id, driver_id, delivery_timestamp,
                status, is_on_time, penalty, bonus, fuel_cost, profit, actual_delivery_time
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        )
        .map_err(sqlite("prepare insert order"))?
        .execute((
            order.id.0,
            order.order_code.as_str(),
            order.customer_name.as_str(),
            order.value,
            order.route_id.0,
            order.driver_id.map(|id| id.0),
            order.delivery_timestamp,
            order.status.as_str(),
            outcome.is_on_time,
            outcome.penalty,
            outcome.bonus,
            outcome.fuel_cost,
            outcome.profit,
            outcome.actual_delivery_time,
        ))
        .map(|_| ())
        .map_err(sqlite("insert order"))
}

fn apply_update(
    transaction: &Transaction<'_>,
    update: &OrderUpdate,
) -> Result<(), SqliteStoreError> {
    let order_id = update.order_id;
    let outcome = &update.outcome;
    let changed = transaction
        .prepare_cached(
            "UPDATE orders SET
                driver_id = ?1, status = ?2, is_on_time = ?3, penalty = ?4, bonus = ?5,
                fuel_cost = ?6, profit = ?7, actual_delivery_time = ?8
             WHERE id = ?9",
        )
        .and_then(|mut statement| {
            statement.execute((
                update.driver_id.0,
                update.status.as_str(),
                outcome.is_on_time,
                outcome.penalty,
                outcome.bonus,
                outcome.fuel_cost,
                outcome.profit,
                outcome.actual_delivery_time,
                order_id.0,
            ))
        })
        .map_err(|source| SqliteStoreError::UpdateOrder { order_id, source })?;
    if changed == 0 {
        return Err(SqliteStoreError::MissingOrder { order_id });
    }
    Ok(())
}

struct OrderRow {
    id: u64,
    order_code: String,
    customer_name: String,
    value: f64,
    route_id: u64,
    driver_id: Option<u64>,
    delivery_timestamp: DateTime<Utc>,
    status: String,
    outcome: DeliveryOutcome,
}

impl OrderRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            order_code: row.get(1)?,
            customer_name: row.get(2)?,
            value: row.get(3)?,
            route_id: row.get(4)?,
            driver_id: row.get(5)?,
            delivery_timestamp: row.get(6)?,
            status: row.get(7)?,
            outcome: DeliveryOutcome {
                is_on_time: row.get(8)?,
                penalty: row.get(9)?,
                bonus: row.get(10)?,
                fuel_cost: row.get(11)?,
                profit: row.get(12)?,
                actual_delivery_time: row.get::<_, Option<NaiveDateTime>>(13)?,
            },
        })
    }

    fn into_order(self) -> Result<Order, SqliteStoreError> {
        let status: OrderStatus = self
            .status
            .parse()
            .map_err(|_| SqliteStoreError::InvalidValue {
                table: "orders",
                id: self.id,
                column: "status",
                value: self.status.clone(),
            })?;
        Ok(Order {
            id: OrderId(self.id),
            order_code: self.order_code,
            customer_name: self.customer_name,
            value: self.value,
            route_id: RouteId(self.route_id),
            driver_id: self.driver_id.map(DriverId),
            delivery_timestamp: self.delivery_timestamp,
            status,
            outcome: self.outcome,
        })
    }
}

impl DeliveryStore for SqliteDeliveryStore {
    type Error = SqliteStoreError;

    fn active_drivers(&self) -> Result<Vec<Driver>, Self::Error> {
        let mut statement = self
            .connection
            .prepare_cached(
                "SELECT id, name, current_shift_hours, past_7_day_work_hours, is_active
                 FROM drivers WHERE is_active = 1 ORDER BY id",
            )
            .map_err(sqlite("prepare driver query"))?;
        let rows = statement
            .query_map([], |row| {
                Ok(Driver {
                    id: DriverId(row.get(0)?),
                    name: row.get(1)?,
                    current_shift_hours: row.get(2)?,
                    past_7_day_work_hours: row.get(3)?,
                    is_active: row.get(4)?,
                })
            })
            .map_err(sqlite("query drivers"))?;
        rows.collect::<Result<_, _>>()
            .map_err(sqlite("read driver row"))
    }

    fn routes(&self) -> Result<Vec<Route>, Self::Error> {
        let mut statement = self
            .connection
            .prepare_cached(
                "SELECT id, route_code, name, distance_km, traffic_level, base_time_minutes,
                        is_active
                 FROM routes ORDER BY id",
            )
            .map_err(sqlite("prepare route query"))?;
        let rows = statement
            .query_map([], |row| {
                Ok((
                    row.get::<_, u64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, f64>(5)?,
                    row.get::<_, bool>(6)?,
                ))
            })
            .map_err(sqlite("query routes"))?;

        let mut routes = Vec::new();
        for row in rows {
            let (id, route_code, name, distance_km, traffic, base_time_minutes, is_active) =
                row.map_err(sqlite("read route row"))?;
            let traffic_level: TrafficLevel =
                traffic.parse().map_err(|_| SqliteStoreError::InvalidValue {
                    table: "routes",
                    id,
                    column: "traffic_level",
                    value: traffic.clone(),
                })?;
            routes.push(Route {
                id: RouteId(id),
                route_code,
                name,
                distance_km,
                traffic_level,
                base_time_minutes,
                is_active,
            });
        }
        Ok(routes)
    }

    fn pending_orders(&self) -> Result<Vec<Order>, Self::Error> {
        self.read_orders("WHERE status = 'pending'")
    }

    fn all_orders(&self) -> Result<Vec<Order>, Self::Error> {
        self.read_orders("")
    }

    fn apply_updates(&mut self, updates: &[OrderUpdate]) -> Result<UpdateReport, Self::Error> {
        let transaction = self
            .connection
            .transaction()
            .map_err(sqlite("begin update transaction"))?;
        let mut updated = Vec::with_capacity(updates.len());
        for update in updates {
            // Dropping the transaction on error rolls back earlier writes.
            apply_update(&transaction, update)?;
            updated.push(update.order_id);
        }
        transaction
            .commit()
            .map_err(sqlite("commit update transaction"))?;
        debug!("wrote back {} order updates", updated.len());
        Ok(UpdateReport { updated })
    }
}
