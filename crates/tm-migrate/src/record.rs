//! What the engine reports back.

use chrono::NaiveDateTime;
use tm_core::ScriptName;

/// One row of the migration table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRecord {
    /// Script file name
    pub name: String,
    /// Server time the script was recorded
    pub applied_at: NaiveDateTime,
}

/// Outcome of a successful [`Migrator::run`](crate::Migrator::run).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Scripts applied by this run, in order
    pub applied: Vec<ScriptName>,
    /// Discovered scripts that were already recorded
    pub skipped: usize,
    /// Recorded names with no matching script in the source
    pub missing: Vec<String>,
}

impl MigrationReport {
    /// Whether the run changed nothing.
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Snapshot from [`Migrator::status`](crate::Migrator::status).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Recorded scripts, oldest first
    pub applied: Vec<MigrationRecord>,
    /// Scripts a `migrate` call would apply, in application order
    pub pending: Vec<ScriptName>,
    /// Recorded names with no matching script in the source
    pub missing: Vec<String>,
}
