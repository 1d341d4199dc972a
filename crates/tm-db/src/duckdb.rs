//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::rows::{Row, Rows};
use crate::traits::Storage;
use crate::value::Value;
use chrono::{DateTime, NaiveDate};
use duckdb::types::{TimeUnit, ToSqlOutput, Value as DuckValue};
use duckdb::{params_from_iter, Connection, ToSql};
use std::sync::{Mutex, MutexGuard};

/// Path that selects a private in-memory database.
const MEMORY_PATH: &str = ":memory:";

/// Days from 0001-01-01 to 1970-01-01; DuckDB dates count from the latter.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// DuckDB database backend
///
/// Holds the database path until [`Storage::connect`] opens it.
pub struct DuckDbBackend {
    path: String,
    conn: Mutex<Option<Connection>>,
}

impl DuckDbBackend {
    /// Create a backend for a file path (or `:memory:`), not yet connected
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            conn: Mutex::new(None),
        }
    }

    /// Create a backend for a private in-memory database, not yet connected
    pub fn in_memory() -> Self {
        Self::new(MEMORY_PATH)
    }

    /// Create and connect in one step
    pub fn open(path: impl Into<String>) -> DbResult<Self> {
        let backend = Self::new(path);
        backend.connect()?;
        Ok(backend)
    }

    /// Create and connect a private in-memory database
    pub fn open_in_memory() -> DbResult<Self> {
        Self::open(MEMORY_PATH)
    }

    /// The configured database path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether `connect` has been called without a matching `close`
    pub fn is_connected(&self) -> DbResult<bool> {
        Ok(self.lock()?.is_some())
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Option<Connection>>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Run `f` against the open connection
    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> DbResult<T>) -> DbResult<T> {
        let guard = self.lock()?;
        let conn = guard.as_ref().ok_or(DbError::NotConnected)?;
        f(conn)
    }
}

impl Storage for DuckDbBackend {
    fn connect(&self) -> DbResult<()> {
        let mut guard = self.lock()?;
        if guard.is_some() {
            return Ok(());
        }
        let conn = if self.path == MEMORY_PATH {
            Connection::open_in_memory()
        } else {
            Connection::open(&self.path)
        }
        .map_err(|e| DbError::ConnectionError(format!("{e}: {}", self.path)))?;
        log::debug!("Opened DuckDB database at {}", self.path);
        *guard = Some(conn);
        Ok(())
    }

    fn execute(&self, sql: &str, params: &[Value]) -> DbResult<usize> {
        self.with_conn(|conn| {
            conn.execute(sql, params_from_iter(params.iter()))
                .map_err(DbError::from)
        })
    }

    fn query(&self, sql: &str, params: &[Value]) -> DbResult<Rows> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let mut rows = stmt.query(params_from_iter(params.iter()))?;
            let mut collected = Vec::new();
            while let Some(row) = rows.next()? {
                let mut values = Vec::new();
                for idx in 0usize.. {
                    match row.get::<_, DuckValue>(idx) {
                        Ok(value) => values.push(from_duck_value(value)),
                        Err(duckdb::Error::InvalidColumnIndex(_)) => break,
                        Err(e) => return Err(e.into()),
                    }
                }
                collected.push(Row::new(values));
            }
            Ok(Rows::new(collected))
        })
    }

    fn close(&self) -> DbResult<()> {
        let mut guard = self.lock()?;
        if let Some(conn) = guard.take() {
            conn.close()
                .map_err(|(_, e)| DbError::ConnectionError(e.to_string()))?;
            log::debug!("Closed DuckDB database at {}", self.path);
        }
        Ok(())
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        let value = match self {
            Value::Null => DuckValue::Null,
            Value::Bool(b) => DuckValue::Boolean(*b),
            Value::Int(i) => DuckValue::BigInt(*i),
            Value::Float(f) => DuckValue::Double(*f),
            Value::Text(s) => DuckValue::Text(s.clone()),
            Value::Blob(b) => DuckValue::Blob(b.clone()),
            Value::Timestamp(ts) => {
                DuckValue::Timestamp(TimeUnit::Microsecond, ts.and_utc().timestamp_micros())
            }
        };
        Ok(ToSqlOutput::Owned(value))
    }
}

/// Convert a DuckDB value into the backend-neutral [`Value`].
///
/// Types without a direct counterpart (intervals, nested types) are rendered
/// as text.
fn from_duck_value(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Bool(b),
        DuckValue::TinyInt(i) => Value::Int(i64::from(i)),
        DuckValue::SmallInt(i) => Value::Int(i64::from(i)),
        DuckValue::Int(i) => Value::Int(i64::from(i)),
        DuckValue::BigInt(i) => Value::Int(i),
        DuckValue::UTinyInt(i) => Value::Int(i64::from(i)),
        DuckValue::USmallInt(i) => Value::Int(i64::from(i)),
        DuckValue::UInt(i) => Value::Int(i64::from(i)),
        DuckValue::UBigInt(i) => i64::try_from(i)
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Text(i.to_string())),
        DuckValue::HugeInt(i) => i64::try_from(i)
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Text(i.to_string())),
        DuckValue::Float(f) => Value::Float(f64::from(f)),
        DuckValue::Double(f) => Value::Float(f),
        DuckValue::Decimal(d) => Value::Text(d.to_string()),
        DuckValue::Text(s) => Value::Text(s),
        DuckValue::Blob(b) => Value::Blob(b),
        DuckValue::Timestamp(unit, v) => timestamp_value(unit, v),
        DuckValue::Date32(days) => days
            .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(Value::Timestamp)
            .unwrap_or(Value::Null),
        other => Value::Text(format!("{other:?}")),
    }
}

fn timestamp_value(unit: TimeUnit, v: i64) -> Value {
    let micros = match unit {
        TimeUnit::Second => v.saturating_mul(1_000_000),
        TimeUnit::Millisecond => v.saturating_mul(1_000),
        TimeUnit::Microsecond => v,
        TimeUnit::Nanosecond => v / 1_000,
    };
    DateTime::from_timestamp_micros(micros)
        .map(|dt| Value::Timestamp(dt.naive_utc()))
        .unwrap_or(Value::Null)
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
