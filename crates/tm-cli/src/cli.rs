//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use tm_core::DbType;

/// Tidemark - apply SQL migration scripts to a database exactly once
#[derive(Parser, Debug)]
#[command(name = "tm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file (default: tidemark.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Directory holding the .sql migration scripts
    #[arg(short, long, global = true, env = "TM_SCRIPTS_DIR")]
    pub dir: Option<String>,

    /// Name of the table that records applied scripts
    #[arg(short, long, global = true)]
    pub table: Option<String>,

    /// Database backend
    #[arg(short, long, global = true, value_enum)]
    pub backend: Option<BackendArg>,

    /// DuckDB database file (or :memory:)
    #[arg(long, global = true)]
    pub database_path: Option<String>,

    /// MySQL host
    #[arg(long, global = true, env = "DB_HOST")]
    pub host: Option<String>,

    /// MySQL port (0 means 3306)
    #[arg(long, global = true, env = "DB_PORT")]
    pub port: Option<u16>,

    /// MySQL user
    #[arg(short, long, global = true, env = "DB_USER")]
    pub user: Option<String>,

    /// MySQL password
    #[arg(long, global = true, env = "DB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// MySQL database name
    #[arg(long, global = true, env = "DB_NAME")]
    pub db_name: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply every script not yet recorded, in file name order
    Migrate,

    /// Show applied and pending scripts without applying anything
    Status(StatusArgs),
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Only list scripts that have not been applied
    #[arg(long)]
    pub pending_only: bool,
}

/// Database backends selectable on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendArg {
    /// Embedded DuckDB database
    Duckdb,
    /// MySQL server
    Mysql,
}

impl From<BackendArg> for DbType {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Duckdb => DbType::DuckDb,
            BackendArg::Mysql => DbType::MySql,
        }
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
