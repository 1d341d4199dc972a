//! Validated name of the migration table.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Name used when no migration table is configured.
pub const DEFAULT_MIGRATION_TABLE: &str = "migration";

/// Longest identifier accepted. MySQL caps identifiers at 64 characters.
const MAX_IDENTIFIER_LEN: usize = 64;

/// Name of the table that records applied scripts.
///
/// The name is substituted directly into DDL and queries, so construction is
/// restricted to plain SQL identifiers: an ASCII letter or underscore followed
/// by ASCII letters, digits, or underscores, that is not a reserved word in
/// DuckDB or MySQL. Such names need no quoting in either database.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MigrationTableName(String);

impl MigrationTableName {
    /// Validate and wrap a table name.
    pub fn new(name: impl Into<String>) -> CoreResult<Self> {
        let name = name.into();
        if let Some(reason) = identifier_violation(&name) {
            return Err(CoreError::InvalidTableName { name, reason });
        }
        Ok(Self(name))
    }

    /// Return the underlying name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MigrationTableName {
    fn default() -> Self {
        Self(DEFAULT_MIGRATION_TABLE.to_string())
    }
}

/// Describe why `name` is not an acceptable identifier, or `None` if it is.
fn identifier_violation(name: &str) -> Option<String> {
    let mut chars = name.chars();
    match chars.next() {
        None => return Some("name must not be empty".to_string()),
        Some(c) if !(c.is_ascii_alphabetic() || c == '_') => {
            return Some("name must start with a letter or underscore".to_string())
        }
        Some(_) => {}
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Some("name may only contain letters, digits and underscores".to_string());
    }
    if name.len() > MAX_IDENTIFIER_LEN {
        return Some(format!(
            "name must be at most {MAX_IDENTIFIER_LEN} characters"
        ));
    }
    if is_reserved_word(name) {
        return Some("name is a reserved SQL keyword".to_string());
    }
    None
}

/// Whether `name` is reserved (case-insensitively) in DuckDB or MySQL and
/// would need quoting as a table name.
pub fn is_reserved_word(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    RESERVED_WORDS.binary_search(&upper.as_str()).is_ok()
}

/// Reserved and type/function-name keywords of DuckDB plus the reserved
/// words of MySQL 8. Sorted for binary search.
const RESERVED_WORDS: &[&str] = &[
    "ACCESSIBLE", "ADD", "ALL", "ALTER", "ANALYSE", "ANALYZE", "AND", "ANTI", "ANY",
    "ARRAY", "AS", "ASC", "ASENSITIVE", "ASOF", "ASYMMETRIC", "AUTHORIZATION",
    "BEFORE", "BETWEEN", "BIGINT", "BINARY", "BLOB", "BOTH", "BY", "CALL",
    "CASCADE", "CASE", "CAST", "CHANGE", "CHAR", "CHARACTER", "CHECK", "COLLATE",
    "COLLATION", "COLUMN", "COLUMNS", "CONCURRENTLY", "CONDITION", "CONSTRAINT",
    "CONTINUE", "CONVERT", "CREATE", "CROSS", "CUBE", "CUME_DIST", "CURRENT_DATE",
    "CURRENT_TIME", "CURRENT_TIMESTAMP", "CURRENT_USER", "CURSOR", "DATABASE",
    "DATABASES", "DAY_HOUR", "DAY_MICROSECOND", "DAY_MINUTE", "DAY_SECOND", "DEC",
    "DECIMAL", "DECLARE", "DEFAULT", "DEFERRABLE", "DELAYED", "DELETE",
    "DENSE_RANK", "DESC", "DESCRIBE", "DETERMINISTIC", "DISTINCT", "DISTINCTROW",
    "DIV", "DO", "DOUBLE", "DROP", "DUAL", "EACH", "ELSE", "ELSEIF", "EMPTY",
    "ENCLOSED", "END", "ESCAPED", "EXCEPT", "EXISTS", "EXIT", "EXPLAIN", "FALSE",
    "FETCH", "FIRST_VALUE", "FLOAT", "FLOAT4", "FLOAT8", "FOR", "FORCE", "FOREIGN",
    "FREEZE", "FROM", "FULL", "FULLTEXT", "FUNCTION", "GENERATED", "GET", "GLOB",
    "GRANT", "GROUP", "GROUPING", "GROUPS", "HAVING", "HIGH_PRIORITY",
    "HOUR_MICROSECOND", "HOUR_MINUTE", "HOUR_SECOND", "IF", "IGNORE", "ILIKE", "IN",
    "INDEX", "INFILE", "INITIALLY", "INNER", "INOUT", "INSENSITIVE", "INSERT", "INT",
    "INT1", "INT2", "INT3", "INT4", "INT8", "INTEGER", "INTERSECT", "INTERVAL",
    "INTO", "IO_AFTER_GTIDS", "IO_BEFORE_GTIDS", "IS", "ISNULL", "ITERATE", "JOIN",
    "JSON_TABLE", "KEY", "KEYS", "KILL", "LAG", "LAST_VALUE", "LATERAL", "LEAD",
    "LEADING", "LEAVE", "LEFT", "LIKE", "LIMIT", "LINEAR", "LINES", "LOAD",
    "LOCALTIME", "LOCALTIMESTAMP", "LOCK", "LONG", "LONGBLOB", "LONGTEXT", "LOOP",
    "LOW_PRIORITY", "MAP", "MASTER_BIND", "MASTER_SSL_VERIFY_SERVER_CERT", "MATCH",
    "MAXVALUE", "MEDIUMBLOB", "MEDIUMINT", "MEDIUMTEXT", "MIDDLEINT",
    "MINUTE_MICROSECOND", "MINUTE_SECOND", "MOD", "MODIFIES", "NATURAL", "NOT",
    "NOTNULL", "NO_WRITE_TO_BINLOG", "NTH_VALUE", "NTILE", "NULL", "NUMERIC", "OF",
    "OFFSET", "ON", "ONLY", "OPTIMIZE", "OPTIMIZER_COSTS", "OPTION", "OPTIONALLY",
    "OR", "ORDER", "OUT", "OUTER", "OUTFILE", "OVER", "OVERLAPS", "PARTITION",
    "PERCENT_RANK", "PIVOT", "PIVOT_LONGER", "PIVOT_WIDER", "PLACING", "POSITIONAL",
    "PRECISION", "PRIMARY", "PROCEDURE", "PURGE", "QUALIFY", "RANGE", "RANK",
    "READ", "READS", "READ_WRITE", "REAL", "RECURSIVE", "REFERENCES", "REGEXP",
    "RELEASE", "RENAME", "REPEAT", "REPLACE", "REQUIRE", "RESIGNAL", "RESTRICT",
    "RETURN", "RETURNING", "REVOKE", "RIGHT", "RLIKE", "ROW", "ROWS", "ROW_NUMBER",
    "SCHEMA", "SCHEMAS", "SECOND_MICROSECOND", "SELECT", "SEMI", "SENSITIVE",
    "SEPARATOR", "SET", "SHOW", "SIGNAL", "SIMILAR", "SMALLINT", "SOME", "SPATIAL",
    "SPECIFIC", "SQL", "SQLEXCEPTION", "SQLSTATE", "SQLWARNING", "SQL_BIG_RESULT",
    "SQL_CALC_FOUND_ROWS", "SQL_SMALL_RESULT", "SSL", "STARTING", "STORED",
    "STRAIGHT_JOIN", "STRUCT", "SUMMARIZE", "SYMMETRIC", "SYSTEM", "TABLE",
    "TABLESAMPLE", "TERMINATED", "THEN", "TINYBLOB", "TINYINT", "TINYTEXT", "TO",
    "TRAILING", "TRIGGER", "TRUE", "TRY_CAST", "UNDO", "UNION", "UNIQUE", "UNLOCK",
    "UNPIVOT", "UNSIGNED", "UPDATE", "USAGE", "USE", "USING", "UTC_DATE",
    "UTC_TIME", "UTC_TIMESTAMP", "VALUES", "VARBINARY", "VARCHAR", "VARCHARACTER",
    "VARIADIC", "VARYING", "VERBOSE", "VIRTUAL", "WHEN", "WHERE", "WHILE", "WINDOW",
    "WITH", "WRITE", "XOR", "YEAR_MONTH", "ZEROFILL",
];

impl fmt::Display for MigrationTableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MigrationTableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for MigrationTableName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MigrationTableName {
    type Error = CoreError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<&str> for MigrationTableName {
    type Error = CoreError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<MigrationTableName> for String {
    fn from(name: MigrationTableName) -> Self {
        name.0
    }
}

impl PartialEq<&str> for MigrationTableName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[path = "table_name_test.rs"]
mod tests;
