//! tm-migrate - Migration engine for Tidemark
//!
//! Applies `.sql` scripts to a database exactly once each. Every
//! [`Migrator::migrate`] call:
//!
//! 1. creates the migration table if it does not exist,
//! 2. lists the scripts in the [`ScriptSource`],
//! 3. reads the names already recorded in the migration table,
//! 4. applies the unrecorded scripts in lexical order of file name, recording
//!    each one after it runs, and stops at the first failure.
//!
//! Scripts are recorded after they execute, not in the same transaction, so a
//! script that ran but could not be recorded is run again next time. Write
//! scripts that tolerate re-execution (`CREATE TABLE IF NOT EXISTS`, ...).
//!
//! There is no locking between concurrent migrators; run one at a time.

pub mod diff;
pub mod error;
pub mod migrator;
pub mod record;
pub mod session;
pub mod source;
pub(crate) mod table;

pub use diff::{apply_order, diff, missing};
pub use error::{MigrateError, MigrateResult};
pub use migrator::Migrator;
pub use record::{MigrationRecord, MigrationReport, MigrationStatus};
pub use session::with_connection;
pub use source::{DirectorySource, MemorySource, ScriptEntry, ScriptSource, SCRIPT_EXTENSION};
