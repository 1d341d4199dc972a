//! Configuration types and parsing for tidemark.yml

use crate::connection::ConnectionConfig;
use crate::error::{CoreError, CoreResult};
use crate::table_name::MigrationTableName;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File names probed by [`Config::load_from_dir`], in order.
const CONFIG_FILE_NAMES: [&str; 2] = ["tidemark.yml", "tidemark.yaml"];

/// Default directory holding migration scripts, relative to the project root
const DEFAULT_SCRIPTS_DIR: &str = "migrations";

/// Project configuration from tidemark.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory searched (recursively) for `.sql` scripts
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: String,

    /// Table recording applied scripts
    #[serde(default)]
    pub table: MigrationTableName,

    /// Which backend to talk to
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Network connection settings (MySQL backend)
    #[serde(default)]
    pub connection: ConnectionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scripts_dir: default_scripts_dir(),
            table: MigrationTableName::default(),
            database: DatabaseConfig::default(),
            connection: ConnectionConfig::default(),
        }
    }
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
    /// MySQL / MariaDB
    MySql,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
            DbType::MySql => write!(f, "mysql"),
        }
    }
}

/// Backend selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database type (duckdb or mysql)
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Database path (DuckDB file or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DbType::default(),
            path: default_db_path(),
        }
    }
}

fn default_scripts_dir() -> String {
    DEFAULT_SCRIPTS_DIR.to_string()
}

fn default_db_path() -> String {
    ":memory:".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for tidemark.yml or tidemark.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for file_name in CONFIG_FILE_NAMES {
            let path = dir.join(file_name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        Err(CoreError::ConfigNotFound {
            path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
        })
    }

    /// Like [`load_from_dir`](Self::load_from_dir), but falls back to the
    /// defaults when the directory has no config file.
    pub fn load_from_dir_or_default(dir: &Path) -> CoreResult<Self> {
        match Self::load_from_dir(dir) {
            Err(CoreError::ConfigNotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    /// Resolve `scripts_dir` against a project root.
    ///
    /// Absolute paths are returned unchanged.
    pub fn scripts_dir_absolute(&self, root: &Path) -> PathBuf {
        let dir = Path::new(&self.scripts_dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            root.join(dir)
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.scripts_dir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "scripts_dir cannot be empty".to_string(),
            });
        }

        if self.database.db_type == DbType::DuckDb && self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty for the duckdb backend".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
