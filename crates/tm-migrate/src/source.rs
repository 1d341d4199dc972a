//! Where migration scripts come from.

use std::io;
use std::path::{Path, PathBuf};

/// File extension recognized as a migration script.
pub const SCRIPT_EXTENSION: &str = "sql";

/// One entry listed by a [`ScriptSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEntry {
    /// Bare file name, e.g. `001_init.sql`
    pub name: String,
    /// Whether the entry is a regular file
    pub is_file: bool,
    /// Where the body lives, as understood by the source that listed it
    pub path: PathBuf,
}

impl ScriptEntry {
    /// Whether this entry is a script the engine should consider.
    ///
    /// Any regular file whose name ends in `.sql` counts, including one named
    /// just `.sql`.
    pub fn is_script(&self) -> bool {
        self.is_file
            && self
                .name
                .strip_suffix(SCRIPT_EXTENSION)
                .is_some_and(|stem| stem.ends_with('.'))
    }
}

/// A listable, readable collection of migration scripts.
pub trait ScriptSource {
    /// List every entry, recursively. Order is unspecified.
    fn list(&self) -> io::Result<Vec<ScriptEntry>>;

    /// Read the full text of an entry returned by [`list`](Self::list).
    fn read(&self, entry: &ScriptEntry) -> io::Result<String>;

    /// Human-readable location, used in error messages.
    fn location(&self) -> String;
}

/// Scripts stored as files under a root directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ScriptSource for DirectorySource {
    fn list(&self) -> io::Result<Vec<ScriptEntry>> {
        let mut entries = Vec::new();
        walk(&self.root, &mut entries)?;
        Ok(entries)
    }

    fn read(&self, entry: &ScriptEntry) -> io::Result<String> {
        std::fs::read_to_string(&entry.path)
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}

/// Recursively collect entries under `dir`.
///
/// Symlinked directories are not followed; symlinks to files count as files.
fn walk(dir: &Path, entries: &mut Vec<ScriptEntry>) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            walk(&path, entries)?;
            continue;
        }
        let is_file = file_type.is_file() || (file_type.is_symlink() && path.is_file());
        entries.push(ScriptEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_file,
            path,
        });
    }
    Ok(())
}

/// Scripts held in memory, e.g. compiled in with `include_str!`.
///
/// Listing preserves insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    scripts: Vec<(String, String)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(file name, body)` pairs.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            scripts: pairs
                .iter()
                .map(|(name, body)| (name.to_string(), body.to_string()))
                .collect(),
        }
    }

    pub fn with_script(mut self, name: impl Into<String>, body: impl Into<String>) -> Self {
        self.scripts.push((name.into(), body.into()));
        self
    }
}

impl ScriptSource for MemorySource {
    fn list(&self) -> io::Result<Vec<ScriptEntry>> {
        Ok(self
            .scripts
            .iter()
            .map(|(name, _)| ScriptEntry {
                name: name.clone(),
                is_file: true,
                path: PathBuf::from(name),
            })
            .collect())
    }

    fn read(&self, entry: &ScriptEntry) -> io::Result<String> {
        self.scripts
            .iter()
            .find(|(name, _)| Path::new(name) == entry.path.as_path())
            .map(|(_, body)| body.clone())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no in-memory script named {}", entry.path.display()),
                )
            })
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
