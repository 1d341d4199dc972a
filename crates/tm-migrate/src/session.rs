//! Scoped connection handling for callers of the engine.

use crate::error::{MigrateError, MigrateResult};
use tm_db::Storage;

/// Connect `db`, run `body`, and close `db` whether or not `body` succeeded.
///
/// A failed connect is a [`MigrateError::Connectivity`] and `body` never runs.
/// A failed close is only reported when `body` succeeded; otherwise it is
/// logged and the body's error wins.
pub fn with_connection<S, T, F>(db: &S, body: F) -> MigrateResult<T>
where
    S: Storage + ?Sized,
    F: FnOnce(&S) -> MigrateResult<T>,
{
    db.connect().map_err(|source| MigrateError::Connectivity {
        backend: db.db_type(),
        source,
    })?;

    let result = body(db);

    match (db.close(), result) {
        (Ok(()), result) => result,
        (Err(source), Ok(_)) => Err(MigrateError::Connectivity {
            backend: db.db_type(),
            source,
        }),
        (Err(close_err), Err(err)) => {
            log::warn!("Failed to close {} connection: {close_err}", db.db_type());
            Err(err)
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
