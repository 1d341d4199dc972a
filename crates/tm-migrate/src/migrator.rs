//! The migration engine.

use crate::diff::{apply_order, diff, missing};
use crate::error::{MigrateError, MigrateResult};
use crate::record::{MigrationRecord, MigrationReport, MigrationStatus};
use crate::source::{DirectorySource, ScriptEntry, ScriptSource};
use crate::table;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tm_core::{MigrationTableName, ScriptName};
use tm_db::{DbError, Storage, Value};

/// Where a `run` currently is. Logged at debug level on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    TableReady,
    Discovered { scripts: usize },
    Diffed { pending: usize },
    Applying { index: usize, total: usize },
    Done,
}

/// A discovered script: its record key and where its body lives.
#[derive(Debug, Clone)]
struct Script {
    name: ScriptName,
    entry: ScriptEntry,
}

impl AsRef<str> for Script {
    fn as_ref(&self) -> &str {
        self.name.as_str()
    }
}

/// Applies unrecorded scripts from a [`ScriptSource`] to a [`Storage`].
///
/// The storage must already be connected; the migrator never opens or closes
/// it. See [`with_connection`](crate::with_connection).
pub struct Migrator<'a, S: Storage + ?Sized, Src: ScriptSource = DirectorySource> {
    db: &'a S,
    source: Src,
    table: MigrationTableName,
}

impl<'a, S: Storage + ?Sized> Migrator<'a, S, DirectorySource> {
    /// Migrator over the `.sql` files under `dir`.
    pub fn from_dir(db: &'a S, dir: impl Into<PathBuf>) -> Self {
        Self::new(db, DirectorySource::new(dir))
    }
}

impl<'a, S: Storage + ?Sized, Src: ScriptSource> Migrator<'a, S, Src> {
    /// Create a migrator recording into the default `migration` table.
    pub fn new(db: &'a S, source: Src) -> Self {
        Self {
            db,
            source,
            table: MigrationTableName::default(),
        }
    }

    /// Record into `table` instead of the default.
    pub fn with_table(mut self, table: MigrationTableName) -> Self {
        self.table = table;
        self
    }

    pub fn table(&self) -> &MigrationTableName {
        &self.table
    }

    pub fn source(&self) -> &Src {
        &self.source
    }

    /// Apply every unrecorded script in lexical order of file name.
    ///
    /// Stops at the first failure; scripts applied before it stay recorded.
    pub fn migrate(&self) -> MigrateResult<()> {
        self.run().map(|_| ())
    }

    /// Like [`migrate`](Self::migrate), returning what was done.
    pub fn run(&self) -> MigrateResult<MigrationReport> {
        self.enter(Phase::Start);

        self.ensure_table()?;
        self.enter(Phase::TableReady);

        let scripts = self.discover()?;
        self.enter(Phase::Discovered {
            scripts: scripts.len(),
        });

        let applied = self.applied_names()?;
        let drift = self.check_drift(&scripts, &applied);
        let pending = apply_order(diff(scripts.iter().cloned(), &applied));
        let skipped = scripts.len() - pending.len();
        self.enter(Phase::Diffed {
            pending: pending.len(),
        });

        let total = pending.len();
        let mut report = MigrationReport {
            applied: Vec::with_capacity(total),
            skipped,
            missing: drift,
        };
        for (index, script) in pending.into_iter().enumerate() {
            self.enter(Phase::Applying { index, total });
            self.apply(&script)?;
            report.applied.push(script.name);
        }

        self.enter(Phase::Done);
        Ok(report)
    }

    /// Scripts `migrate` would apply, in application order. Creates the
    /// migration table if needed but applies nothing.
    pub fn pending(&self) -> MigrateResult<Vec<ScriptName>> {
        self.ensure_table()?;
        let scripts = self.discover()?;
        let applied = self.applied_names()?;
        Ok(apply_order(diff(scripts, &applied))
            .into_iter()
            .map(|script| script.name)
            .collect())
    }

    /// Recorded migrations, oldest first. Creates the migration table if
    /// needed.
    pub fn applied_records(&self) -> MigrateResult<Vec<MigrationRecord>> {
        self.ensure_table()?;
        let sql = table::select_records(&self.table);
        let mut rows = self.db.query(&sql, &[]).map_err(|e| self.query_error(e))?;

        let mut records = Vec::new();
        while rows.advance() {
            let name = rows.get::<String>(0).map_err(|e| self.query_error(e))?;
            let applied_at = rows
                .get::<NaiveDateTime>(1)
                .map_err(|e| self.query_error(e))?;
            records.push(MigrationRecord { name, applied_at });
        }
        rows.close();
        Ok(records)
    }

    /// Applied records, pending scripts and drift in one pass.
    pub fn status(&self) -> MigrateResult<MigrationStatus> {
        let applied = self.applied_records()?;
        let scripts = self.discover()?;
        let names: Vec<&str> = applied.iter().map(|r| r.name.as_str()).collect();
        let missing = missing(&scripts, &names);
        let pending = apply_order(diff(scripts, &names))
            .into_iter()
            .map(|script| script.name)
            .collect();
        Ok(MigrationStatus {
            applied,
            pending,
            missing,
        })
    }

    fn enter(&self, phase: Phase) {
        log::debug!("Migration table '{}': {:?}", self.table, phase);
    }

    fn ensure_table(&self) -> MigrateResult<()> {
        self.db
            .execute(
                &table::create_table(&self.table, self.db.timestamp_type()),
                &[],
            )
            .map(|_| ())
            .map_err(|source| MigrateError::Bootstrap {
                table: self.table.to_string(),
                source,
            })
    }

    /// List the source, keeping `.sql` regular files and rejecting
    /// duplicate names.
    fn discover(&self) -> MigrateResult<Vec<Script>> {
        let entries = self.source.list().map_err(|source| MigrateError::Discovery {
            location: self.source.location(),
            source,
        })?;

        let mut seen: HashMap<String, PathBuf> = HashMap::new();
        let mut scripts = Vec::new();
        for entry in entries.into_iter().filter(ScriptEntry::is_script) {
            let name = ScriptName::parse(entry.name.as_str()).map_err(|source| {
                MigrateError::InvalidScriptName {
                    path: display(&entry.path),
                    source,
                }
            })?;
            if let Some(first) = seen.get(name.as_str()) {
                return Err(MigrateError::DuplicateScript {
                    name: name.into_inner(),
                    first: display(first),
                    second: display(&entry.path),
                });
            }
            seen.insert(name.to_string(), entry.path.clone());
            scripts.push(Script { name, entry });
        }

        log::debug!(
            "Discovered {} migration script(s) in {}",
            scripts.len(),
            self.source.location()
        );
        Ok(scripts)
    }

    fn applied_names(&self) -> MigrateResult<Vec<String>> {
        let sql = table::select_applied_names(&self.table);
        let mut rows = self.db.query(&sql, &[]).map_err(|e| self.query_error(e))?;

        let mut names = Vec::new();
        while rows.advance() {
            names.push(rows.get::<String>(0).map_err(|e| self.query_error(e))?);
        }
        rows.close();
        Ok(names)
    }

    fn check_drift(&self, scripts: &[Script], applied: &[String]) -> Vec<String> {
        let drift = missing(scripts, applied);
        for name in &drift {
            log::warn!(
                "Migration '{}' is recorded in '{}' but no longer found in {}",
                name,
                self.table,
                self.source.location()
            );
        }
        drift
    }

    /// Read, execute and record one script.
    fn apply(&self, script: &Script) -> MigrateResult<()> {
        let name = script.name.as_str();
        let body = self
            .source
            .read(&script.entry)
            .map_err(|source| MigrateError::ScriptRead {
                script: name.to_string(),
                source,
            })?;

        let sql = body.trim();
        if sql.is_empty() {
            return Err(MigrateError::ScriptRead {
                script: name.to_string(),
                source: io::Error::new(io::ErrorKind::InvalidData, "script is empty"),
            });
        }

        log::debug!("Applying migration {name}");
        self.db
            .execute(sql, &[])
            .map_err(|source| MigrateError::Execution {
                script: name.to_string(),
                source,
            })?;

        self.db
            .execute(
                &table::insert_record(&self.table, self.db.current_timestamp()),
                &[Value::from(name)],
            )
            .map_err(|source| MigrateError::RecordInsert {
                script: name.to_string(),
                table: self.table.to_string(),
                source,
            })?;

        log::info!("Applied migration {name}");
        Ok(())
    }

    fn query_error(&self, source: DbError) -> MigrateError {
        MigrateError::Query {
            table: self.table.to_string(),
            source,
        }
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
