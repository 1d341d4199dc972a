//! Runtime context for CLI commands

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tm_core::{Config, DbType, MigrationTableName};
use tm_db::{DuckDbBackend, Storage};
use tm_migrate::Migrator;

use crate::cli::GlobalArgs;

/// Resolved configuration plus a not-yet-connected storage backend
pub struct RuntimeContext {
    /// Configuration after command-line overrides
    pub config: Config,

    /// Absolute (or cwd-relative) location of the scripts
    pub scripts_dir: PathBuf,

    /// Database backend; commands connect and close it
    pub db: Box<dyn Storage>,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let (config, root) = load_config(args)?;
        let config = apply_overrides(config, args)?;
        let scripts_dir = config.scripts_dir_absolute(&root);
        let db = build_storage(&config)?;

        log::debug!(
            "Using {} backend, scripts in {}, table '{}'",
            config.database.db_type,
            scripts_dir.display(),
            config.table
        );

        Ok(Self {
            config,
            scripts_dir,
            db,
        })
    }

    /// Migrator over the configured scripts, recording into the configured
    /// table.
    pub fn migrator<'a, S: Storage + ?Sized>(&self, db: &'a S) -> Migrator<'a, S> {
        Migrator::from_dir(db, self.scripts_dir.clone()).with_table(self.config.table.clone())
    }
}

/// Load config from `--config`, or from the current directory if it has a
/// config file. Returns the config and the directory relative paths in it
/// resolve against.
fn load_config(args: &GlobalArgs) -> Result<(Config, PathBuf)> {
    match &args.config {
        Some(path) => {
            let path = Path::new(path);
            let config = Config::load(path).context("Failed to load configuration file")?;
            let root = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            Ok((config, root))
        }
        None => {
            let root = PathBuf::from(".");
            let config = Config::load_from_dir_or_default(&root)
                .context("Failed to load project configuration")?;
            Ok((config, root))
        }
    }
}

/// Overlay command-line flags (and their environment fallbacks) on `config`.
pub(crate) fn apply_overrides(mut config: Config, args: &GlobalArgs) -> Result<Config> {
    if let Some(dir) = &args.dir {
        config.scripts_dir = dir.clone();
    }
    if let Some(table) = &args.table {
        config.table = MigrationTableName::new(table.as_str())
            .with_context(|| format!("Invalid --table value '{table}'"))?;
    }
    if let Some(backend) = args.backend {
        config.database.db_type = backend.into();
    }
    if let Some(path) = &args.database_path {
        config.database.path = path.clone();
    }

    let conn = &mut config.connection;
    if let Some(host) = &args.host {
        conn.host = host.clone();
    }
    if let Some(port) = args.port {
        conn.port = port;
    }
    if let Some(user) = &args.user {
        conn.user = user.clone();
    }
    if let Some(password) = &args.password {
        conn.password = password.clone();
    }
    if let Some(name) = &args.db_name {
        conn.name = name.clone();
    }

    if config.scripts_dir.trim().is_empty() {
        bail!("Scripts directory cannot be empty");
    }
    Ok(config)
}

/// Construct the backend selected by `config`, without connecting.
pub(crate) fn build_storage(config: &Config) -> Result<Box<dyn Storage>> {
    match config.database.db_type {
        DbType::DuckDb => Ok(Box::new(DuckDbBackend::new(config.database.path.clone()))),
        DbType::MySql => mysql_storage(config),
    }
}

#[cfg(feature = "mysql")]
fn mysql_storage(config: &Config) -> Result<Box<dyn Storage>> {
    Ok(Box::new(tm_db::MySqlBackend::new(&config.connection)))
}

#[cfg(not(feature = "mysql"))]
fn mysql_storage(_config: &Config) -> Result<Box<dyn Storage>> {
    bail!("This build of tm has no MySQL support; rebuild with `--features mysql`")
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
