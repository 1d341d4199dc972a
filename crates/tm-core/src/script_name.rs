//! Strongly-typed migration script name.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Longest script name the migration table can hold, in characters.
pub const MAX_SCRIPT_NAME_LEN: usize = 200;

/// Bare file name of a migration script, e.g. `001_create_users.sql`.
///
/// This is the key stored in the migration table. Ordering is the byte-wise
/// lexical ordering of the underlying string, which is the order scripts are
/// applied in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScriptName(String);

impl ScriptName {
    /// Create a new `ScriptName`, panicking in debug builds if the name is empty.
    ///
    /// Prefer [`parse`](Self::parse) when handling untrusted input.
    pub fn new(name: impl Into<String>) -> Self {
        let s = name.into();
        debug_assert!(!s.is_empty(), "ScriptName must not be empty");
        Self(s)
    }

    /// Validate a script file name.
    ///
    /// Rejects empty names, names containing a path separator, and names
    /// longer than [`MAX_SCRIPT_NAME_LEN`] characters.
    pub fn parse(name: impl Into<String>) -> CoreResult<Self> {
        let name = name.into();
        let reason = if name.is_empty() {
            "name must not be empty".to_string()
        } else if name.contains(['/', '\\']) {
            "name must not contain '/' or '\\'".to_string()
        } else if name.chars().count() > MAX_SCRIPT_NAME_LEN {
            format!("name must be at most {MAX_SCRIPT_NAME_LEN} characters")
        } else {
            return Ok(Self(name));
        };
        Err(CoreError::InvalidScriptName { name, reason })
    }

    /// Like [`parse`](Self::parse), discarding the reason.
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        Self::parse(name).ok()
    }

    /// Return the underlying name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ScriptName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ScriptName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ScriptName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ScriptName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ScriptName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ScriptName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<String> for ScriptName {
    fn eq(&self, other: &String) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[path = "script_name_test.rs"]
mod tests;
