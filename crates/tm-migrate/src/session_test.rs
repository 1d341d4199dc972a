use super::*;
use crate::error::MigrateError;
use std::cell::Cell;
use tm_db::{DbError, DbResult, Rows, Value};

#[derive(Default)]
struct Lifecycle {
    connected: Cell<bool>,
    closes: Cell<usize>,
    fail_connect: bool,
    fail_close: bool,
}

impl Storage for Lifecycle {
    fn connect(&self) -> DbResult<()> {
        if self.fail_connect {
            return Err(DbError::ConnectionError("refused".into()));
        }
        self.connected.set(true);
        Ok(())
    }

    fn execute(&self, _sql: &str, _params: &[Value]) -> DbResult<usize> {
        Ok(0)
    }

    fn query(&self, _sql: &str, _params: &[Value]) -> DbResult<Rows> {
        Ok(Rows::default())
    }

    fn close(&self) -> DbResult<()> {
        self.closes.set(self.closes.get() + 1);
        self.connected.set(false);
        if self.fail_close {
            return Err(DbError::ConnectionError("reset".into()));
        }
        Ok(())
    }

    fn db_type(&self) -> &'static str {
        "lifecycle"
    }
}

fn body_error() -> MigrateError {
    MigrateError::Execution {
        script: "001.sql".into(),
        source: DbError::ExecutionError("boom".into()),
    }
}

#[test]
fn test_connects_runs_and_closes() {
    let db = Lifecycle::default();

    let value = with_connection(&db, |db| {
        assert!(db.connected.get());
        Ok(7)
    })
    .unwrap();

    assert_eq!(value, 7);
    assert_eq!(db.closes.get(), 1);
    assert!(!db.connected.get());
}

#[test]
fn test_connect_failure_skips_body() {
    let db = Lifecycle {
        fail_connect: true,
        ..Default::default()
    };
    let ran = Cell::new(false);

    let err = with_connection(&db, |_| {
        ran.set(true);
        Ok(())
    })
    .unwrap_err();

    assert!(matches!(err, MigrateError::Connectivity { backend: "lifecycle", .. }));
    assert!(!ran.get());
    assert_eq!(db.closes.get(), 0);
}

#[test]
fn test_closes_when_body_fails() {
    let db = Lifecycle::default();

    let err = with_connection(&db, |_| Err::<(), _>(body_error())).unwrap_err();

    assert!(matches!(err, MigrateError::Execution { .. }));
    assert_eq!(db.closes.get(), 1);
}

#[test]
fn test_close_failure_after_success_is_reported() {
    let db = Lifecycle {
        fail_close: true,
        ..Default::default()
    };

    let err = with_connection(&db, |_| Ok(())).unwrap_err();

    assert!(matches!(err, MigrateError::Connectivity { .. }));
}

#[test]
fn test_body_error_wins_over_close_failure() {
    let db = Lifecycle {
        fail_close: true,
        ..Default::default()
    };

    let err = with_connection(&db, |_| Err::<(), _>(body_error())).unwrap_err();

    assert!(matches!(err, MigrateError::Execution { .. }));
}
