//! Set arithmetic between discovered scripts and applied records.
//!
//! Pure functions; no I/O.

use std::collections::HashSet;

/// Items of `discovered` whose name is not in `applied`, in discovered order.
pub fn diff<T, A>(discovered: impl IntoIterator<Item = T>, applied: &[A]) -> Vec<T>
where
    T: AsRef<str>,
    A: AsRef<str>,
{
    let applied: HashSet<&str> = applied.iter().map(AsRef::as_ref).collect();
    discovered
        .into_iter()
        .filter(|item| !applied.contains(item.as_ref()))
        .collect()
}

/// Names in `applied` that no longer appear in `discovered`, in applied
/// order.
pub fn missing<T, A>(discovered: &[T], applied: &[A]) -> Vec<String>
where
    T: AsRef<str>,
    A: AsRef<str>,
{
    let discovered: HashSet<&str> = discovered.iter().map(AsRef::as_ref).collect();
    applied
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !discovered.contains(name))
        .map(str::to_string)
        .collect()
}

/// Sort pending items into application order: ascending byte-wise order of
/// name.
pub fn apply_order<T: AsRef<str>>(mut pending: Vec<T>) -> Vec<T> {
    pending.sort_by(|a, b| a.as_ref().cmp(b.as_ref()));
    pending
}

#[cfg(test)]
#[path = "diff_test.rs"]
mod tests;
