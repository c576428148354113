//! SQLite connection management for the recipe store.
//!
//! [`Database`] owns the single connection used for the lifetime of the
//! process and exposes the primitives every repository builds on: single
//! statement execution, row queries, transactions, and the schema version
//! stored in the `user_version` header field.
//!
//! Every statement failure is logged and returned with the statement text and
//! its parameters attached. Nothing here retries.

use std::{
    cell::Cell,
    path::{Path, PathBuf},
};

use log::{debug, error, info, warn};
use rusqlite::{params_from_iter, types::Value, Connection, OptionalExtension, Row};

use crate::error::{DatabaseResultExt, Result, StoreError};

pub mod migrations;
pub mod schema;
pub mod update;

pub use migrations::{Migration, MigrationRunner, MigrationState, MigrationStatus};

/// Database connection and operations handler.
///
/// A `Database` starts uninitialized; [`Database::initialize`] opens the
/// file and applies the storage pragmas. Until then every operation fails
/// with [`StoreError::NotInitialized`].
#[derive(Debug, Default)]
pub struct Database {
    connection: Option<Connection>,
    path: Option<PathBuf>,
    transaction_depth: Cell<u32>,
}

impl Database {
    /// Creates an uninitialized manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens (creating if needed) the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut db = Self::new();
        db.initialize(path)?;
        Ok(db)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let mut db = Self::new();
        db.initialize_in_memory()?;
        Ok(db)
    }

    /// Opens the connection. Calling this on a ready manager is a no-op.
    pub fn initialize<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        if self.is_ready() {
            return Ok(());
        }
        let path = path.as_ref();
        let connection =
            Connection::open(path).db_context("Failed to initialize database connection")?;
        Self::apply_pragmas(&connection)?;
        info!("Database connection initialized at {}", path.display());
        self.connection = Some(connection);
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Opens an in-memory connection. Calling this on a ready manager is a
    /// no-op.
    pub fn initialize_in_memory(&mut self) -> Result<()> {
        if self.is_ready() {
            return Ok(());
        }
        let connection = Connection::open_in_memory()
            .db_context("Failed to initialize in-memory database connection")?;
        Self::apply_pragmas(&connection)?;
        info!("In-memory database connection initialized");
        self.connection = Some(connection);
        self.path = None;
        Ok(())
    }

    /// Storage policy: foreign keys enforced, write-ahead logging, and
    /// NORMAL synchronous mode. In-memory databases report `memory` for the
    /// journal mode.
    fn apply_pragmas(connection: &Connection) -> Result<()> {
        connection
            .pragma_update(None, "foreign_keys", "ON")
            .db_context("Failed to enable foreign keys")?;
        let journal_mode: String = connection
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .db_context("Failed to set journal mode")?;
        connection
            .pragma_update(None, "synchronous", "NORMAL")
            .db_context("Failed to set synchronous mode")?;
        debug!("Storage pragmas applied (journal_mode={journal_mode})");
        Ok(())
    }

    /// True once the connection is open.
    pub fn is_ready(&self) -> bool {
        self.connection.is_some()
    }

    /// Path of the database file, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn connection(&self) -> Result<&Connection> {
        self.connection.as_ref().ok_or(StoreError::NotInitialized)
    }

    /// Runs a single mutating statement and returns the number of affected
    /// rows.
    pub fn execute(&self, sql: &str, params: &[Value]) -> Result<usize> {
        let connection = self.connection()?;
        connection
            .execute(sql, params_from_iter(params.iter()))
            .map_err(|e| write_failed(sql, params, e))
    }

    /// Runs a batch of parameterless statements (DDL).
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        let connection = self.connection()?;
        connection
            .execute_batch(sql)
            .map_err(|e| write_failed(sql, &[], e))
    }

    /// Runs a read statement and maps every row with `map`.
    pub fn query<T, F>(&self, sql: &str, params: &[Value], map: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let connection = self.connection()?;
        let run = || -> rusqlite::Result<Vec<T>> {
            let mut stmt = connection.prepare(sql)?;
            let rows = stmt.query_map(params_from_iter(params.iter()), map)?;
            rows.collect()
        };
        run().map_err(|e| query_failed(sql, params, e))
    }

    /// Runs a read statement expected to produce at most one row.
    pub fn query_optional<T, F>(&self, sql: &str, params: &[Value], map: F) -> Result<Option<T>>
    where
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let connection = self.connection()?;
        connection
            .query_row(sql, params_from_iter(params.iter()), map)
            .optional()
            .map_err(|e| query_failed(sql, params, e))
    }

    /// Runs a `SELECT COUNT(*)` style statement.
    pub fn query_count(&self, sql: &str, params: &[Value]) -> Result<u64> {
        let count: Option<i64> = self.query_optional(sql, params, |row| row.get(0))?;
        Ok(count.map_or(0, |c| c.max(0) as u64))
    }

    /// Runs `body` inside a transaction.
    ///
    /// Commits when `body` returns `Ok`, rolls back and returns the original
    /// error otherwise. A call made from inside another `transaction` body
    /// joins the outer transaction: the outermost call alone decides commit
    /// or rollback.
    pub fn transaction<T, F>(&self, body: F) -> Result<T>
    where
        F: FnOnce(&Self) -> Result<T>,
    {
        let connection = self.connection()?;

        if self.transaction_depth.get() > 0 {
            return body(self);
        }
        if !connection.is_autocommit() {
            return Err(StoreError::TransactionActive);
        }

        let mut guard = TransactionGuard::begin(connection, &self.transaction_depth)?;
        let result = body(self).and_then(|value| {
            guard.commit()?;
            Ok(value)
        });
        if let Err(err) = &result {
            guard.rollback(err);
        }
        result
    }

    /// True while a [`Database::transaction`] body is running.
    pub fn in_transaction(&self) -> bool {
        self.transaction_depth.get() > 0
    }

    /// Reads the schema version from the database header.
    pub fn user_version(&self) -> Result<u32> {
        let connection = self.connection()?;
        connection
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .map_err(|e| query_failed("PRAGMA user_version", &[], e))
    }

    /// Writes the schema version into the database header. Participates in
    /// the surrounding transaction, if any.
    pub fn set_user_version(&self, version: u32) -> Result<()> {
        let connection = self.connection()?;
        connection
            .pragma_update(None, "user_version", version)
            .map_err(|e| {
                write_failed(
                    "PRAGMA user_version = ?",
                    &[Value::Integer(i64::from(version))],
                    e,
                )
            })
    }

    /// Closes the connection. Later operations fail with `NotInitialized`.
    pub fn close(&mut self) -> Result<()> {
        if let Some(connection) = self.connection.take() {
            if let Err((connection, e)) = connection.close() {
                self.connection = Some(connection);
                return Err(StoreError::database("Failed to close database connection")
                    .with_source(e));
            }
            self.path = None;
            info!("Database connection closed");
        }
        Ok(())
    }

    /// Round-trips a trivial statement. Never fails; returns `false` when
    /// the connection is missing or broken.
    pub fn health_check(&self) -> bool {
        match self.query_optional("SELECT 1", &[], |row| row.get::<_, i64>(0)) {
            Ok(Some(1)) => true,
            Ok(_) => false,
            Err(e) => {
                warn!("Database health check failed: {e}");
                false
            }
        }
    }
}

/// An open engine transaction plus one level of `transaction_depth`.
///
/// Dropping the guard while the transaction is still open (the body
/// panicked) rolls it back, so the connection is usable afterwards.
struct TransactionGuard<'a> {
    connection: &'a Connection,
    depth: &'a Cell<u32>,
    open: bool,
}

impl<'a> TransactionGuard<'a> {
    fn begin(connection: &'a Connection, depth: &'a Cell<u32>) -> Result<Self> {
        connection
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| write_failed("BEGIN TRANSACTION", &[], e))?;
        depth.set(depth.get() + 1);
        Ok(Self {
            connection,
            depth,
            open: true,
        })
    }

    fn commit(&mut self) -> Result<()> {
        self.connection
            .execute_batch("COMMIT")
            .map_err(|e| write_failed("COMMIT", &[], e))?;
        self.open = false;
        Ok(())
    }

    fn rollback(&mut self, cause: &dyn std::fmt::Display) {
        self.open = false;
        if self.connection.is_autocommit() {
            warn!("Transaction failed after the engine ended it: {cause}");
        } else if let Err(rollback_err) = self.connection.execute_batch("ROLLBACK") {
            error!("Rollback failed after '{cause}': {rollback_err}");
        } else {
            warn!("Transaction failed, rolled back: {cause}");
        }
    }
}

impl Drop for TransactionGuard<'_> {
    fn drop(&mut self) {
        if self.open {
            self.rollback(&"transaction body panicked");
        }
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

fn render_params(params: &[Value]) -> Vec<String> {
    params.iter().map(|p| format!("{p:?}")).collect()
}

fn query_failed(sql: &str, params: &[Value], source: rusqlite::Error) -> StoreError {
    error!("Query failed: {sql} {params:?}: {source}");
    StoreError::QueryFailed {
        statement: sql.trim().to_string(),
        params: render_params(params),
        source,
    }
}

fn write_failed(sql: &str, params: &[Value], source: rusqlite::Error) -> StoreError {
    error!("Write failed: {sql} {params:?}: {source}");
    StoreError::WriteFailed {
        statement: sql.trim().to_string(),
        params: render_params(params),
        source,
    }
}

/// Constructors for bound parameter values.
pub mod value {
    use jiff::{civil::Date, Timestamp};
    use rusqlite::types::Value;

    use crate::models::timestamp_to_text;

    pub fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    pub fn opt_text(s: Option<&str>) -> Value {
        s.map_or(Value::Null, text)
    }

    pub fn int(i: i64) -> Value {
        Value::Integer(i)
    }

    pub fn opt_int(i: Option<i64>) -> Value {
        i.map_or(Value::Null, Value::Integer)
    }

    pub fn opt_real(f: Option<f64>) -> Value {
        f.map_or(Value::Null, Value::Real)
    }

    pub fn timestamp(ts: &Timestamp) -> Value {
        Value::Text(timestamp_to_text(ts))
    }

    pub fn date(date: Date) -> Value {
        Value::Text(date.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_db() -> Database {
        Database::open_in_memory().expect("Failed to open in-memory database")
    }

    #[test]
    fn test_uninitialized_operations_fail() {
        let db = Database::new();
        assert!(!db.is_ready());
        assert!(matches!(
            db.execute("SELECT 1", &[]),
            Err(StoreError::NotInitialized)
        ));
        assert!(matches!(db.user_version(), Err(StoreError::NotInitialized)));
        assert!(matches!(
            db.transaction(|_| Ok(())),
            Err(StoreError::NotInitialized)
        ));
        assert!(!db.health_check());
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let db = memory_db();
        let fk: Option<i64> = db
            .query_optional("PRAGMA foreign_keys", &[], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, Some(1));
    }

    #[test]
    fn test_user_version_roundtrip() {
        let db = memory_db();
        assert_eq!(db.user_version().unwrap(), 0);
        db.set_user_version(7).unwrap();
        assert_eq!(db.user_version().unwrap(), 7);
    }

    #[test]
    fn test_transaction_commits() {
        let db = memory_db();
        db.execute_batch("CREATE TABLE t (v INTEGER)").unwrap();
        db.transaction(|db| {
            db.execute("INSERT INTO t (v) VALUES (?1)", &[value::int(1)])?;
            db.execute("INSERT INTO t (v) VALUES (?1)", &[value::int(2)])
        })
        .unwrap();
        assert_eq!(db.query_count("SELECT COUNT(*) FROM t", &[]).unwrap(), 2);
        assert!(!db.in_transaction());
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let db = memory_db();
        db.execute_batch("CREATE TABLE t (v INTEGER)").unwrap();
        let result: Result<()> = db.transaction(|db| {
            db.execute("INSERT INTO t (v) VALUES (?1)", &[value::int(1)])?;
            Err(StoreError::not_found("Row", "missing"))
        });
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
        assert_eq!(db.query_count("SELECT COUNT(*) FROM t", &[]).unwrap(), 0);
    }

    #[test]
    fn test_nested_transaction_joins_outer() {
        let db = memory_db();
        db.execute_batch("CREATE TABLE t (v INTEGER)").unwrap();
        let result: Result<()> = db.transaction(|db| {
            db.transaction(|db| db.execute("INSERT INTO t (v) VALUES (1)", &[]))?;
            assert!(db.in_transaction());
            Err(StoreError::Configuration {
                message: "abort".to_string(),
            })
        });
        assert!(result.is_err());
        // The inner body's insert belonged to the outer transaction.
        assert_eq!(db.query_count("SELECT COUNT(*) FROM t", &[]).unwrap(), 0);
    }

    #[test]
    fn test_panicking_body_rolls_back() {
        let db = memory_db();
        db.execute_batch("CREATE TABLE t (v INTEGER)").unwrap();

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            db.transaction(|db| -> Result<()> {
                db.execute("INSERT INTO t (v) VALUES (1)", &[])?;
                panic!("boom");
            })
        }));
        assert!(outcome.is_err());
        assert!(!db.in_transaction());
        assert_eq!(db.query_count("SELECT COUNT(*) FROM t", &[]).unwrap(), 0);

        // The connection is back in autocommit and accepts new transactions.
        db.transaction(|db| db.execute("INSERT INTO t (v) VALUES (2)", &[]))
            .unwrap();
        assert_eq!(db.query_count("SELECT COUNT(*) FROM t", &[]).unwrap(), 1);
    }

    #[test]
    fn test_foreign_transaction_is_rejected() {
        let db = memory_db();
        db.execute_batch("BEGIN").unwrap();
        let result = db.transaction(|_| Ok(()));
        assert!(matches!(result, Err(StoreError::TransactionActive)));
        db.execute_batch("ROLLBACK").unwrap();
    }

    #[test]
    fn test_failed_statement_carries_context() {
        let db = memory_db();
        let err = db
            .execute("INSERT INTO missing_table (v) VALUES (?1)", &[value::int(42)])
            .unwrap_err();
        match err {
            StoreError::WriteFailed {
                statement, params, ..
            } => {
                assert!(statement.contains("missing_table"));
                assert_eq!(params, vec!["Integer(42)".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = db.query("SELECT * FROM nowhere", &[], |row| row.get::<_, i64>(0));
        assert!(matches!(err, Err(StoreError::QueryFailed { .. })));
    }

    #[test]
    fn test_close_then_operations_fail() {
        let mut db = memory_db();
        assert!(db.health_check());
        db.close().unwrap();
        assert!(!db.is_ready());
        assert!(matches!(
            db.query_count("SELECT 1", &[]),
            Err(StoreError::NotInitialized)
        ));
        // Closing twice is harmless.
        db.close().unwrap();
    }
}
