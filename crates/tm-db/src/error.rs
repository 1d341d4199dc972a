//! Error types for tm-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Statement execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Table not found (D003)
    #[error("[D003] Table or view not found: {0}")]
    TableNotFound(String),

    /// Operation attempted before `connect` or after `close` (D004)
    #[error("[D004] Not connected to the database")]
    NotConnected,

    /// A single-row query returned nothing (D005)
    #[error("[D005] Query returned no rows")]
    NoRows,

    /// Column index past the end of the row, or no current row (D006)
    #[error("[D006] Column {index} out of range for row of {width} columns")]
    ColumnOutOfRange { index: usize, width: usize },

    /// Column value cannot be decoded as the requested type (D007)
    #[error("[D007] Cannot decode column {index} ({found}) as {expected}")]
    TypeMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// Mutex poisoned (D008)
    #[error("[D008] Database mutex poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // duckdb::Error does not expose structured variants for catalog
        // errors, so classify by message with narrow patterns.
        let msg = err.to_string();
        if msg.contains("Table with name")
            || msg.contains("Table or view with name")
            || (msg.contains("Catalog Error") && msg.contains("Table") && msg.contains("not found"))
        {
            DbError::TableNotFound(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}

#[cfg(feature = "mysql")]
impl From<mysql::Error> for DbError {
    fn from(err: mysql::Error) -> Self {
        // ER_NO_SUCH_TABLE
        const NO_SUCH_TABLE: u16 = 1146;
        match &err {
            mysql::Error::MySqlError(e) if e.code == NO_SUCH_TABLE => {
                DbError::TableNotFound(e.message.clone())
            }
            mysql::Error::IoError(_) | mysql::Error::DriverError(_) => {
                DbError::ConnectionError(err.to_string())
            }
            _ => DbError::ExecutionError(err.to_string()),
        }
    }
}
