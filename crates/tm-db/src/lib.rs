//! tm-db - Storage abstraction for Tidemark
//!
//! This crate provides the [`Storage`] trait the migration engine runs
//! against, the [`Value`]/[`Row`]/[`Rows`] types it exchanges, and backend
//! implementations for DuckDB (always available) and MySQL (behind the
//! `mysql` feature).

pub mod duckdb;
pub mod error;
#[cfg(feature = "mysql")]
pub mod mysql;
pub mod rows;
pub mod traits;
pub mod value;

pub use crate::duckdb::DuckDbBackend;
#[cfg(feature = "mysql")]
pub use crate::mysql::MySqlBackend;
pub use error::{DbError, DbResult};
pub use rows::{Row, Rows, SingleRow};
pub use traits::Storage;
pub use value::{FromValue, Value};
