//! tm-core - Core library for Tidemark
//!
//! This crate provides the configuration file format, the database connection
//! settings, and the strongly-typed names (scripts, migration table) shared by
//! the storage backends, the migration engine, and the CLI.

pub mod config;
pub mod connection;
pub mod error;
pub mod script_name;
pub mod table_name;

pub use config::{Config, DatabaseConfig, DbType};
pub use connection::{connection_string, ConnectionConfig, DEFAULT_PORT};
pub use error::{CoreError, CoreResult};
pub use script_name::{ScriptName, MAX_SCRIPT_NAME_LEN};
pub use table_name::{is_reserved_word, MigrationTableName};
