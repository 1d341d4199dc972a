use super::*;
use std::fs;

fn names(mut entries: Vec<ScriptEntry>) -> Vec<String> {
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries.into_iter().map(|e| e.name).collect()
}

#[test]
fn test_is_script() {
    let entry = |name: &str, is_file| ScriptEntry {
        name: name.to_string(),
        is_file,
        path: PathBuf::from(name),
    };
    assert!(entry("001.sql", true).is_script());
    assert!(!entry("001.sql", false).is_script());
    assert!(!entry("001.SQL", true).is_script());
    assert!(!entry("001.sql.bak", true).is_script());
    assert!(!entry("README.md", true).is_script());
    assert!(!entry("sql", true).is_script());
    assert!(!entry("001sql", true).is_script());
    assert!(entry(".sql", true).is_script());
}

#[test]
fn test_directory_lists_recursively() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("001.sql"), "SELECT 1").unwrap();
    fs::create_dir_all(dir.path().join("nested/deeper")).unwrap();
    fs::write(dir.path().join("nested/002.sql"), "SELECT 2").unwrap();
    fs::write(dir.path().join("nested/deeper/003.sql"), "SELECT 3").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignore").unwrap();

    let source = DirectorySource::new(dir.path());
    let entries = source.list().unwrap();
    assert!(entries.iter().all(|e| e.is_file));
    assert_eq!(
        names(entries),
        vec!["001.sql", "002.sql", "003.sql", "notes.txt"]
    );
}

#[test]
fn test_directory_entries_are_bare_names() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/010.sql"), "SELECT 10").unwrap();

    let source = DirectorySource::new(dir.path());
    let entries = source.list().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "010.sql");
    assert_eq!(entries[0].path, dir.path().join("sub/010.sql"));
}

#[test]
fn test_directory_reads_nested_script() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/010.sql"), "  SELECT 10\n").unwrap();

    let source = DirectorySource::new(dir.path());
    let entry = source.list().unwrap().remove(0);
    assert_eq!(source.read(&entry).unwrap(), "  SELECT 10\n");
}

#[test]
fn test_directory_missing_root_fails() {
    let dir = tempfile::tempdir().unwrap();
    let source = DirectorySource::new(dir.path().join("non-existent-folder"));
    let err = source.list().unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::NotFound);
}

#[test]
fn test_directory_empty() {
    let dir = tempfile::tempdir().unwrap();
    let source = DirectorySource::new(dir.path());
    assert!(source.list().unwrap().is_empty());
    assert_eq!(source.location(), dir.path().display().to_string());
}

#[test]
fn test_memory_source_preserves_order() {
    let source = MemorySource::from_pairs(&[("003.sql", "c"), ("001.sql", "a")])
        .with_script("002.sql", "b");
    let listed: Vec<String> = source.list().unwrap().into_iter().map(|e| e.name).collect();
    assert_eq!(listed, vec!["003.sql", "001.sql", "002.sql"]);
}

#[test]
fn test_memory_source_read() {
    let source = MemorySource::new().with_script("001.sql", "CREATE TABLE a (id INT)");
    let entry = source.list().unwrap().remove(0);
    assert_eq!(source.read(&entry).unwrap(), "CREATE TABLE a (id INT)");

    let ghost = ScriptEntry {
        name: "404.sql".to_string(),
        is_file: true,
        path: PathBuf::from("404.sql"),
    };
    assert_eq!(
        source.read(&ghost).unwrap_err().kind(),
        io::ErrorKind::NotFound
    );
}
