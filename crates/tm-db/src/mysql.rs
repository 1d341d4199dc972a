//! MySQL database backend implementation (feature `mysql`)

use crate::error::{DbError, DbResult};
use crate::rows::{Row, Rows};
use crate::traits::Storage;
use crate::value::Value;
use chrono::{Datelike, NaiveDate, Timelike};
use mysql::prelude::Queryable;
use mysql::{Conn, Opts, Params, Value as MyValue};
use std::sync::{Mutex, MutexGuard};
use tm_core::connection::{connection_string, ConnectionConfig};

/// MySQL database backend
///
/// Built from a [`ConnectionConfig`]; [`Storage::connect`] dials the server
/// with the one-second timeout carried in the connection string.
pub struct MySqlBackend {
    url: String,
    host: String,
    conn: Mutex<Option<Conn>>,
}

impl MySqlBackend {
    /// Create a backend for `config`, not yet connected
    pub fn new(config: &ConnectionConfig) -> Self {
        Self {
            url: connection_string(config),
            host: config.host.clone(),
            conn: Mutex::new(None),
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Option<Conn>>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Run `f` against the open connection
    fn with_conn<T>(&self, f: impl FnOnce(&mut Conn) -> DbResult<T>) -> DbResult<T> {
        let mut guard = self.lock()?;
        let conn = guard.as_mut().ok_or(DbError::NotConnected)?;
        f(conn)
    }
}

impl Storage for MySqlBackend {
    fn connect(&self) -> DbResult<()> {
        let mut guard = self.lock()?;
        if guard.is_some() {
            return Ok(());
        }
        let opts = Opts::from_url(&self.url)
            .map_err(|e| DbError::ConnectionError(format!("invalid connection string: {e}")))?;
        let conn = Conn::new(opts).map_err(|e| {
            DbError::ConnectionError(format!(
                "unable to connect to {} with provided credentials: {e}",
                self.host
            ))
        })?;
        log::debug!("Connected to MySQL at {}", self.host);
        *guard = Some(conn);
        Ok(())
    }

    fn execute(&self, sql: &str, params: &[Value]) -> DbResult<usize> {
        self.with_conn(|conn| {
            // Parameterless statements go over the text protocol so DDL that
            // cannot be prepared still runs.
            if params.is_empty() {
                conn.query_drop(sql)?;
            } else {
                conn.exec_drop(sql, to_params(params))?;
            }
            Ok(usize::try_from(conn.affected_rows()).unwrap_or(usize::MAX))
        })
    }

    fn query(&self, sql: &str, params: &[Value]) -> DbResult<Rows> {
        self.with_conn(|conn| {
            let rows: Vec<mysql::Row> = if params.is_empty() {
                conn.query(sql)?
            } else {
                conn.exec(sql, to_params(params))?
            };
            Ok(Rows::new(
                rows.into_iter()
                    .map(|row| Row::new(row_values(row.unwrap_raw())))
                    .collect(),
            ))
        })
    }

    fn close(&self) -> DbResult<()> {
        let mut guard = self.lock()?;
        if guard.take().is_some() {
            log::debug!("Closed MySQL connection to {}", self.host);
        }
        Ok(())
    }

    /// `DATETIME` alone truncates to whole seconds.
    fn timestamp_type(&self) -> &'static str {
        "DATETIME(6)"
    }

    fn current_timestamp(&self) -> &'static str {
        "CURRENT_TIMESTAMP(6)"
    }

    fn db_type(&self) -> &'static str {
        "mysql"
    }
}

/// Decode raw column values; a column already taken from the row reads as
/// NULL.
fn row_values(raw: Vec<Option<MyValue>>) -> Vec<Value> {
    raw.into_iter()
        .map(|value| value.map_or(Value::Null, from_mysql_value))
        .collect()
}

fn to_params(params: &[Value]) -> Params {
    Params::Positional(params.iter().map(to_mysql_value).collect())
}

fn to_mysql_value(value: &Value) -> MyValue {
    match value {
        Value::Null => MyValue::NULL,
        Value::Bool(b) => MyValue::Int(i64::from(*b)),
        Value::Int(i) => MyValue::Int(*i),
        Value::Float(f) => MyValue::Double(*f),
        Value::Text(s) => MyValue::Bytes(s.clone().into_bytes()),
        Value::Blob(b) => MyValue::Bytes(b.clone()),
        Value::Timestamp(ts) => MyValue::Date(
            u16::try_from(ts.year()).unwrap_or(0),
            ts.month() as u8,
            ts.day() as u8,
            ts.hour() as u8,
            ts.minute() as u8,
            ts.second() as u8,
            ts.and_utc().timestamp_subsec_micros(),
        ),
    }
}

fn from_mysql_value(value: MyValue) -> Value {
    match value {
        MyValue::NULL => Value::Null,
        MyValue::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(s) => Value::Text(s),
            Err(e) => Value::Blob(e.into_bytes()),
        },
        MyValue::Int(i) => Value::Int(i),
        MyValue::UInt(u) => i64::try_from(u)
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Text(u.to_string())),
        MyValue::Float(f) => Value::Float(f64::from(f)),
        MyValue::Double(f) => Value::Float(f),
        MyValue::Date(year, month, day, hour, minute, second, micros) => {
            NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
                .and_then(|date| {
                    date.and_hms_micro_opt(
                        u32::from(hour),
                        u32::from(minute),
                        u32::from(second),
                        micros,
                    )
                })
                .map(Value::Timestamp)
                .unwrap_or(Value::Null)
        }
        MyValue::Time(negative, days, hours, minutes, seconds, micros) => Value::Text(format!(
            "{}{}:{:02}:{:02}.{:06}",
            if negative { "-" } else { "" },
            u64::from(days) * 24 + u64::from(hours),
            minutes,
            seconds,
            micros
        )),
    }
}

#[cfg(test)]
#[path = "mysql_test.rs"]
mod tests;
