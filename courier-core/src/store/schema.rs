//! SQLite schema for the delivery record store.

use rusqlite::{Connection, Error as SqliteError, OptionalExtension, Transaction};
use thiserror::Error;

/// Version recorded in `courier_schema_version` by this build.
pub const SCHEMA_VERSION: i64 = 1;

/// Errors raised when initialising the delivery schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Foreign key enforcement could not be switched on.
    #[error("failed to enable SQLite foreign keys")]
    ForeignKeys {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// A migration statement failed.
    #[error("failed to execute migration step '{step}'")]
    Migration {
        /// Human-readable name of the step.
        step: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// The database was created by an incompatible build.
    #[error(
        "expected delivery schema version {expected} but found {found}; apply migrations before retrying"
    )]
    VersionMismatch {
        /// Version this build understands.
        expected: i64,
        /// Version recorded in the database.
        found: i64,
    },
}

/// Create the `drivers`, `routes` and `orders` tables if they are missing.
///
/// Running the function against an initialised database is a no-op. A
/// database stamped with a different schema version is rejected.
///
/// `orders.route_id` deliberately carries no foreign key so that a dangling
/// route reference survives until a run reports it.
///
/// # Examples
/// ```
/// use rusqlite::Connection;
/// use courier_core::store::initialise_schema;
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create schema");
/// initialise_schema(&mut conn).expect("schema is idempotent");
///
/// let version: i64 = conn
///     .query_row("SELECT version FROM courier_schema_version", [], |row| row.get(0))
///     .expect("read schema version");
/// assert_eq!(version, 1);
/// ```
pub fn initialise_schema(connection: &mut Connection) -> Result<(), SchemaError> {
    connection
        .pragma_update(None, "foreign_keys", true)
        .map_err(|source| SchemaError::ForeignKeys { source })?;

    let transaction = connection
        .transaction()
        .map_err(|source| SchemaError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    create_tables(&transaction)?;
    create_indexes(&transaction)?;
    ensure_schema_version(&transaction)?;

    transaction
        .commit()
        .map_err(|source| SchemaError::Migration {
            step: "commit schema transaction",
            source,
        })
}

fn create_tables(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create drivers",
        "CREATE TABLE IF NOT EXISTS drivers (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL CHECK (length(trim(name)) >= 2),
            current_shift_hours REAL NOT NULL CHECK (current_shift_hours BETWEEN 0 AND 24),
            past_7_day_work_hours REAL NOT NULL CHECK (past_7_day_work_hours BETWEEN 0 AND 168),
            is_active INTEGER NOT NULL DEFAULT 1
        )",
    )?;
    run_migration_step(
        transaction,
        "create routes",
        "CREATE TABLE IF NOT EXISTS routes (
            id INTEGER PRIMARY KEY,
            route_code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            distance_km REAL NOT NULL CHECK (distance_km >= 0.1),
            traffic_level TEXT NOT NULL,
            base_time_minutes REAL NOT NULL CHECK (base_time_minutes >= 1),
            is_active INTEGER NOT NULL DEFAULT 1
        )",
    )?;
    run_migration_step(
        transaction,
        "create orders",
        "CREATE TABLE IF NOT EXISTS orders (
            id INTEGER PRIMARY KEY,
            order_code TEXT NOT NULL UNIQUE,
            customer_name TEXT NOT NULL,
            value REAL NOT NULL CHECK (value >= 0),
            route_id INTEGER NOT NULL,
            driver_id INTEGER REFERENCES drivers(id),
            delivery_timestamp TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            is_on_time INTEGER,
            penalty REAL NOT NULL DEFAULT 0,
            bonus REAL NOT NULL DEFAULT 0,
            fuel_cost REAL NOT NULL DEFAULT 0,
            profit REAL NOT NULL DEFAULT 0,
            actual_delivery_time TEXT
        )",
    )
}

fn create_indexes(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "index orders by status",
        "CREATE INDEX IF NOT EXISTS idx_orders_status ON orders(status, id)",
    )
}

fn ensure_schema_version(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create schema version table",
        "CREATE TABLE IF NOT EXISTS courier_schema_version (
            version INTEGER PRIMARY KEY CHECK (version > 0),
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        ) WITHOUT ROWID",
    )?;

    let existing: Option<i64> = transaction
        .query_row(
            "SELECT version FROM courier_schema_version LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|source| SchemaError::Migration {
            step: "read schema version",
            source,
        })?;

    match existing {
        Some(version) if version == SCHEMA_VERSION => Ok(()),
        Some(found) => Err(SchemaError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found,
        }),
        None => transaction
            .execute(
                "INSERT INTO courier_schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )
            .map(|_| ())
            .map_err(|source| SchemaError::Migration {
                step: "record schema version",
                source,
            }),
    }
}

fn run_migration_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), SchemaError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| SchemaError::Migration { step, source })
}
