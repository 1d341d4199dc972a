//! End-to-end migration runs against an in-memory DuckDB.

use std::fs;
use tempfile::TempDir;
use tm_core::MigrationTableName;
use tm_db::{DuckDbBackend, Storage};
use tm_migrate::{with_connection, MemorySource, MigrateError, Migrator};

fn scripts_dir(scripts: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, body) in scripts {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, body).unwrap();
    }
    dir
}

fn recorded(db: &DuckDbBackend, table: &str) -> Vec<String> {
    let mut rows = db
        .query(&format!("SELECT name FROM {table} ORDER BY name"), &[])
        .unwrap();
    let mut names = Vec::new();
    while rows.advance() {
        names.push(rows.get::<String>(0).unwrap());
    }
    names
}

fn table_exists(db: &DuckDbBackend, table: &str) -> bool {
    db.query_one(
        "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
        &[table.into()],
    )
    .get::<i64>(0)
    .unwrap()
        > 0
}

#[test]
fn test_create_table_script_is_applied_and_recorded() {
    let dir = scripts_dir(&[("001_create_foo.sql", "CREATE TABLE foo (id INT)")]);
    let db = DuckDbBackend::open_in_memory().unwrap();

    Migrator::from_dir(&db, dir.path()).migrate().unwrap();

    assert!(table_exists(&db, "foo"));
    assert_eq!(recorded(&db, "migration"), vec!["001_create_foo.sql"]);
}

#[test]
fn test_existing_record_is_skipped() {
    let dir = scripts_dir(&[
        ("001.sql", "CREATE TABLE one (id INT)"),
        ("002.sql", "CREATE TABLE two (id INT)"),
    ]);
    let db = DuckDbBackend::open_in_memory().unwrap();
    db.execute(
        "CREATE TABLE migration (name VARCHAR(200) NOT NULL PRIMARY KEY, applied_at DATETIME NOT NULL)",
        &[],
    )
    .unwrap();
    db.execute(
        "INSERT INTO migration VALUES ('002.sql', TIMESTAMP '2019-01-01 00:00:00')",
        &[],
    )
    .unwrap();

    let report = Migrator::from_dir(&db, dir.path()).run().unwrap();

    assert_eq!(report.applied, vec!["001.sql"]);
    assert_eq!(recorded(&db, "migration"), vec!["001.sql", "002.sql"]);
    assert!(table_exists(&db, "one"));
    assert!(!table_exists(&db, "two"));
}

#[test]
fn test_repeated_runs_are_idempotent() {
    let dir = scripts_dir(&[
        ("001.sql", "CREATE TABLE a (id INT)"),
        ("002.sql", "INSERT INTO a VALUES (1)"),
    ]);
    let db = DuckDbBackend::open_in_memory().unwrap();
    let migrator = Migrator::from_dir(&db, dir.path());

    for _ in 0..3 {
        migrator.migrate().unwrap();
    }

    let count = db
        .query_one("SELECT COUNT(*) FROM a", &[])
        .get::<i64>(0)
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(recorded(&db, "migration"), vec!["001.sql", "002.sql"]);
}

#[test]
fn test_empty_directory_creates_only_the_table() {
    let dir = scripts_dir(&[]);
    let db = DuckDbBackend::open_in_memory().unwrap();

    let report = Migrator::from_dir(&db, dir.path()).run().unwrap();

    assert!(report.is_noop());
    assert!(table_exists(&db, "migration"));
    assert!(recorded(&db, "migration").is_empty());
}

#[test]
fn test_nested_directories_apply_in_name_order() {
    let dir = scripts_dir(&[
        ("b/001_create.sql", "CREATE TABLE t (v VARCHAR)"),
        ("a/003_third.sql", "INSERT INTO t VALUES ('third')"),
        ("002_second.sql", "INSERT INTO t VALUES ('second')"),
        ("notes.txt", "not a migration"),
    ]);
    let db = DuckDbBackend::open_in_memory().unwrap();

    let report = Migrator::from_dir(&db, dir.path()).run().unwrap();

    assert_eq!(
        report.applied,
        vec!["001_create.sql", "002_second.sql", "003_third.sql"]
    );
    let mut rows = db.query("SELECT v FROM t ORDER BY rowid", &[]).unwrap();
    let mut values = Vec::new();
    while rows.advance() {
        values.push(rows.get::<String>(0).unwrap());
    }
    assert_eq!(values, vec!["second", "third"]);
}

#[test]
fn test_partial_failure_then_resume() {
    let dir = scripts_dir(&[
        ("001.sql", "CREATE TABLE ok (id INT)"),
        ("002.sql", "CREATE TABLE broken (id NOT_A_TYPE)"),
        ("003.sql", "CREATE TABLE later (id INT)"),
    ]);
    let db = DuckDbBackend::open_in_memory().unwrap();

    let err = Migrator::from_dir(&db, dir.path()).migrate().unwrap_err();

    assert!(matches!(err, MigrateError::Execution { .. }));
    assert_eq!(err.script(), Some("002.sql"));
    assert_eq!(recorded(&db, "migration"), vec!["001.sql"]);
    assert!(!table_exists(&db, "later"));

    fs::write(dir.path().join("002.sql"), "CREATE TABLE fixed (id INT)").unwrap();
    let report = Migrator::from_dir(&db, dir.path()).run().unwrap();

    assert_eq!(report.applied, vec!["002.sql", "003.sql"]);
    assert!(table_exists(&db, "later"));
}

#[test]
fn test_custom_table_name() {
    let dir = scripts_dir(&[("001.sql", "CREATE TABLE x (id INT)")]);
    let db = DuckDbBackend::open_in_memory().unwrap();
    let table = MigrationTableName::new("schema_history").unwrap();

    Migrator::from_dir(&db, dir.path())
        .with_table(table)
        .migrate()
        .unwrap();

    assert_eq!(recorded(&db, "schema_history"), vec!["001.sql"]);
    assert!(!table_exists(&db, "migration"));
}

#[test]
fn test_applied_records_carry_timestamps() {
    let db = DuckDbBackend::open_in_memory().unwrap();
    let source = MemorySource::from_pairs(&[
        ("001.sql", "CREATE TABLE a (id INT)"),
        ("002.sql", "CREATE TABLE b (id INT)"),
    ]);
    let migrator = Migrator::new(&db, source);
    migrator.migrate().unwrap();

    let records = migrator.applied_records().unwrap();

    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["001.sql", "002.sql"]);
    assert!(records[0].applied_at <= records[1].applied_at);
}

#[test]
fn test_status_after_adding_a_script() {
    let dir = scripts_dir(&[("001.sql", "CREATE TABLE a (id INT)")]);
    let db = DuckDbBackend::open_in_memory().unwrap();
    Migrator::from_dir(&db, dir.path()).migrate().unwrap();
    fs::write(dir.path().join("002.sql"), "CREATE TABLE b (id INT)").unwrap();

    let status = Migrator::from_dir(&db, dir.path()).status().unwrap();

    assert_eq!(status.applied.len(), 1);
    assert_eq!(status.pending, vec!["002.sql"]);
    assert!(status.missing.is_empty());
    assert!(!table_exists(&db, "b"));
}

#[test]
fn test_with_connection_on_file_database() {
    let dir = scripts_dir(&[("001.sql", "CREATE TABLE persisted (id INT)")]);
    let db_dir = tempfile::tempdir().unwrap();
    let db_path = db_dir.path().join("tidemark.duckdb");
    let db = DuckDbBackend::new(db_path.to_string_lossy());

    with_connection(&db, |db| Migrator::from_dir(db, dir.path()).migrate()).unwrap();
    assert!(!db.is_connected().unwrap());

    let reopened = DuckDbBackend::open(db_path.to_string_lossy()).unwrap();
    assert!(table_exists(&reopened, "persisted"));
    assert_eq!(recorded(&reopened, "migration"), vec!["001.sql"]);
}

#[test]
fn test_not_connected_is_bootstrap_error() {
    let dir = scripts_dir(&[("001.sql", "SELECT 1")]);
    let db = DuckDbBackend::in_memory();

    let err = Migrator::from_dir(&db, dir.path()).migrate().unwrap_err();

    assert!(matches!(err, MigrateError::Bootstrap { .. }));
}

#[test]
fn test_reserved_word_table_name_is_rejected_up_front() {
    for reserved in ["order", "group", "select", "table", "key"] {
        assert!(MigrationTableName::new(reserved).is_err(), "{reserved}");
    }
}

#[test]
fn test_keyword_like_table_name_bootstraps() {
    let dir = scripts_dir(&[("001.sql", "CREATE TABLE x (id INT)")]);
    let db = DuckDbBackend::open_in_memory().unwrap();
    let table = MigrationTableName::new("orders").unwrap();

    Migrator::from_dir(&db, dir.path())
        .with_table(table)
        .migrate()
        .unwrap();

    assert_eq!(recorded(&db, "orders"), vec!["001.sql"]);
}
