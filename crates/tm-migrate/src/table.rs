//! SQL for the migration table.
//!
//! The table name is interpolated; [`MigrationTableName`] guarantees it is a
//! plain identifier. Script names are always bound as parameters.

use tm_core::{MigrationTableName, MAX_SCRIPT_NAME_LEN};

/// `CREATE TABLE IF NOT EXISTS` for the migration table.
///
/// `timestamp_type` comes from the backend (`DATETIME` is an alias of
/// `TIMESTAMP` in DuckDB; MySQL needs `DATETIME(6)` to keep microseconds).
pub(crate) fn create_table(table: &MigrationTableName, timestamp_type: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (\
         name VARCHAR({MAX_SCRIPT_NAME_LEN}) NOT NULL PRIMARY KEY, \
         applied_at {timestamp_type} NOT NULL\
         )"
    )
}

/// Applied names, oldest first. Name breaks ties between scripts recorded
/// within the same clock tick.
pub(crate) fn select_applied_names(table: &MigrationTableName) -> String {
    format!("SELECT name FROM {table} ORDER BY applied_at, name")
}

/// Applied records with timestamps, oldest first.
pub(crate) fn select_records(table: &MigrationTableName) -> String {
    format!("SELECT name, applied_at FROM {table} ORDER BY applied_at, name")
}

/// Record one applied script; the timestamp comes from the server.
pub(crate) fn insert_record(table: &MigrationTableName, current_timestamp: &str) -> String {
    format!("INSERT INTO {table} (name, applied_at) VALUES (?, {current_timestamp})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_use_table_name() {
        let table = MigrationTableName::new("schema_history").unwrap();
        assert!(create_table(&table, "DATETIME")
            .starts_with("CREATE TABLE IF NOT EXISTS schema_history ("));
        assert_eq!(
            select_applied_names(&table),
            "SELECT name FROM schema_history ORDER BY applied_at, name"
        );
        assert_eq!(
            insert_record(&table, "CURRENT_TIMESTAMP"),
            "INSERT INTO schema_history (name, applied_at) VALUES (?, CURRENT_TIMESTAMP)"
        );
    }

    #[test]
    fn test_create_table_has_primary_key() {
        let sql = create_table(&MigrationTableName::default(), "DATETIME");
        assert!(sql.contains("name VARCHAR(200) NOT NULL PRIMARY KEY"));
        assert!(sql.contains("applied_at DATETIME NOT NULL"));
    }

    #[test]
    fn test_fractional_timestamp_sql() {
        let table = MigrationTableName::default();
        assert!(create_table(&table, "DATETIME(6)").contains("applied_at DATETIME(6) NOT NULL"));
        assert!(insert_record(&table, "CURRENT_TIMESTAMP(6)")
            .ends_with("VALUES (?, CURRENT_TIMESTAMP(6))"));
    }
}
