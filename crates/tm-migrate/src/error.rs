//! Error types for the migration engine.

use thiserror::Error;
use tm_db::DbError;

/// Migration errors.
///
/// Every error ends the current run. Scripts applied before the failure stay
/// applied and recorded; calling `migrate` again resumes after them.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Could not open or close the database connection (G001).
    #[error("[G001] Cannot connect to {backend} database")]
    Connectivity {
        backend: &'static str,
        #[source]
        source: DbError,
    },

    /// Creating the migration table failed (G002).
    #[error("[G002] Cannot create migration table '{table}'")]
    Bootstrap {
        table: String,
        #[source]
        source: DbError,
    },

    /// Listing the script source failed (G003).
    #[error("[G003] Cannot list migration scripts in {location}")]
    Discovery {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// Two scripts share a file name (G004).
    #[error("[G004] Duplicate migration script '{name}': {first} and {second}")]
    DuplicateScript {
        name: String,
        first: String,
        second: String,
    },

    /// Reading applied migrations failed (G005).
    #[error("[G005] Cannot read applied migrations from '{table}'")]
    Query {
        table: String,
        #[source]
        source: DbError,
    },

    /// A script could not be read, or is empty (G006).
    #[error("[G006] Cannot read migration script '{script}'")]
    ScriptRead {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// A script's statement failed (G007).
    #[error("[G007] Migration script '{script}' failed")]
    Execution {
        script: String,
        #[source]
        source: DbError,
    },

    /// A script ran but its record could not be written (G008).
    #[error("[G008] Migration script '{script}' ran but could not be recorded in '{table}'")]
    RecordInsert {
        script: String,
        table: String,
        #[source]
        source: DbError,
    },

    /// A script's file name cannot be recorded (G009).
    #[error("[G009] Unusable migration script file name at {path}")]
    InvalidScriptName {
        path: String,
        #[source]
        source: tm_core::CoreError,
    },
}

impl MigrateError {
    /// Name of the script the run stopped at, for errors raised while
    /// applying.
    pub fn script(&self) -> Option<&str> {
        match self {
            MigrateError::ScriptRead { script, .. }
            | MigrateError::Execution { script, .. }
            | MigrateError::RecordInsert { script, .. } => Some(script),
            _ => None,
        }
    }
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;
