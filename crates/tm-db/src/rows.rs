//! Result rows, the row cursor returned by [`Storage::query`], and the
//! single-row handle returned by [`Storage::query_one`].
//!
//! [`Storage::query`]: crate::Storage::query
//! [`Storage::query_one`]: crate::Storage::query_one

use crate::error::{DbError, DbResult};
use crate::value::{FromValue, Value};
use std::collections::VecDeque;

/// One result row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Decode column `index` as `T`.
    pub fn get<T: FromValue>(&self, index: usize) -> DbResult<T> {
        let value = self.values.get(index).ok_or(DbError::ColumnOutOfRange {
            index,
            width: self.values.len(),
        })?;
        T::from_value(value).ok_or_else(|| DbError::TypeMismatch {
            index,
            expected: std::any::type_name::<T>(),
            found: value.type_name(),
        })
    }
}

/// Forward-only cursor over a query result.
///
/// Starts positioned before the first row; call [`advance`](Self::advance)
/// before reading. Backends hand over fully fetched results, so the
/// driver-side statement is already finalized when a `Rows` exists; `close`
/// releases the buffered rows early and is implied by drop.
#[derive(Debug, Default)]
pub struct Rows {
    pending: VecDeque<Row>,
    current: Option<Row>,
    closed: bool,
}

impl Rows {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            pending: rows.into(),
            current: None,
            closed: false,
        }
    }

    /// Whether another row is available.
    pub fn has_next(&self) -> bool {
        !self.closed && !self.pending.is_empty()
    }

    /// Move to the next row. Returns `false` once the rows are exhausted or
    /// the cursor was closed.
    pub fn advance(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.current = self.pending.pop_front();
        self.current.is_some()
    }

    /// The row the cursor is positioned on.
    pub fn current(&self) -> Option<&Row> {
        self.current.as_ref()
    }

    /// Decode column `index` of the current row.
    pub fn get<T: FromValue>(&self, index: usize) -> DbResult<T> {
        match &self.current {
            Some(row) => row.get(index),
            None => Err(DbError::ColumnOutOfRange { index, width: 0 }),
        }
    }

    /// Release the result. Further calls to [`advance`](Self::advance)
    /// return `false`.
    pub fn close(&mut self) {
        self.closed = true;
        self.current = None;
        self.pending.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Handle for a query expected to return exactly one interesting row.
///
/// Query errors are deferred until the row is read, so call sites stay a
/// single expression: `db.query_one(sql, &[]).get::<i64>(0)?`.
#[derive(Debug)]
pub struct SingleRow {
    inner: DbResult<Option<Row>>,
}

impl SingleRow {
    /// Wrap the first row of `rows`, if any.
    pub fn from_rows(mut rows: Rows) -> Self {
        let first = if rows.advance() {
            rows.current.take()
        } else {
            None
        };
        rows.close();
        Self { inner: Ok(first) }
    }

    /// A handle that reports `err` when read.
    pub fn failed(err: DbError) -> Self {
        Self { inner: Err(err) }
    }

    /// Take the row, failing with [`DbError::NoRows`] when there is none.
    pub fn into_row(self) -> DbResult<Row> {
        self.inner?.ok_or(DbError::NoRows)
    }

    /// Decode column `index` of the row.
    pub fn get<T: FromValue>(self, index: usize) -> DbResult<T> {
        self.into_row()?.get(index)
    }
}

#[cfg(test)]
#[path = "rows_test.rs"]
mod tests;
