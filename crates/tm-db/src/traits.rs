//! Storage trait definition

use crate::error::DbResult;
use crate::rows::{Rows, SingleRow};
use crate::value::Value;

/// The database capability the migration engine runs against.
///
/// Calls are synchronous and block until the database answers. A backend is
/// constructed disconnected; the owner calls [`connect`](Self::connect) before
/// handing it to the engine and [`close`](Self::close) afterwards.
pub trait Storage {
    /// Open the connection.
    fn connect(&self) -> DbResult<()>;

    /// Execute a statement with positional parameters, returning the number
    /// of affected rows.
    fn execute(&self, sql: &str, params: &[Value]) -> DbResult<usize>;

    /// Run a query with positional parameters and return a cursor over its
    /// rows.
    fn query(&self, sql: &str, params: &[Value]) -> DbResult<Rows>;

    /// Run a query and return a handle to its first row.
    ///
    /// Errors surface when the handle is read.
    fn query_one(&self, sql: &str, params: &[Value]) -> SingleRow {
        match self.query(sql, params) {
            Ok(rows) => SingleRow::from_rows(rows),
            Err(err) => SingleRow::failed(err),
        }
    }

    /// Close the connection.
    fn close(&self) -> DbResult<()>;

    /// Column type for timestamps that must keep sub-second precision.
    fn timestamp_type(&self) -> &'static str {
        "DATETIME"
    }

    /// SQL expression for the server's current time at the precision of
    /// [`timestamp_type`](Self::timestamp_type).
    fn current_timestamp(&self) -> &'static str {
        "CURRENT_TIMESTAMP"
    }

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn connect(&self) -> DbResult<()> {
        (**self).connect()
    }

    fn execute(&self, sql: &str, params: &[Value]) -> DbResult<usize> {
        (**self).execute(sql, params)
    }

    fn query(&self, sql: &str, params: &[Value]) -> DbResult<Rows> {
        (**self).query(sql, params)
    }

    fn query_one(&self, sql: &str, params: &[Value]) -> SingleRow {
        (**self).query_one(sql, params)
    }

    fn close(&self) -> DbResult<()> {
        (**self).close()
    }

    fn timestamp_type(&self) -> &'static str {
        (**self).timestamp_type()
    }

    fn current_timestamp(&self) -> &'static str {
        (**self).current_timestamp()
    }

    fn db_type(&self) -> &'static str {
        (**self).db_type()
    }
}
