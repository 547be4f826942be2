// Snapshot encoding and the file operations that move snapshots in and out

use crate::error::ParseError;
use crate::task::{MAX_TEXT_CHARS, Task};
use eyre::{Context, Result};
use fs2::FileExt;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// File name offered for exported snapshots
pub const DEFAULT_FILE_NAME: &str = "todos.json";

/// Contents of an empty snapshot
pub const EMPTY_SNAPSHOT: &str = "[]";

/// Serialize tasks as a pretty-printed JSON array, in list order
pub fn encode(tasks: &[Task]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(tasks)
}

/// Parse a snapshot and check it against the task list invariants
///
/// Rejects duplicate ids and text that is empty or longer than
/// `MAX_TEXT_CHARS`. Text is kept as-is (not trimmed).
pub fn decode(text: &str) -> Result<Vec<Task>, ParseError> {
    let tasks: Vec<Task> = serde_json::from_str(text)?;

    let mut seen = HashSet::with_capacity(tasks.len());
    for (index, task) in tasks.iter().enumerate() {
        if !seen.insert(task.id()) {
            return Err(ParseError::DuplicateId(task.id().clone()));
        }

        if task.text().trim().is_empty() {
            return Err(ParseError::EmptyText { index });
        }

        let len = task.text().chars().count();
        if len > MAX_TEXT_CHARS {
            return Err(ParseError::TextTooLong { index, len });
        }
    }

    debug!(count = tasks.len(), "Decoded snapshot");
    Ok(tasks)
}

/// Read a snapshot file as text
///
/// A file that doesn't exist yet reads as an empty snapshot.
pub fn read_text(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(text) => {
            info!(file = ?path, bytes = text.len(), "Read snapshot file");
            Ok(text)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(file = ?path, "Snapshot file not found, starting empty");
            Ok(EMPTY_SNAPSHOT.to_string())
        }
        Err(e) => Err(e).wrap_err_with(|| format!("Failed to read snapshot file {}", path.display())),
    }
}

/// Write snapshot text to a file, replacing its contents
///
/// The text goes to a temp file next to `path`, which is synced and then
/// renamed over `path`, so the target holds either the old or the new
/// snapshot. Concurrent writers are serialized through a `<path>.lock` file.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let lock = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(lock_path(path))
        .wrap_err_with(|| format!("Failed to open lock file for {}", path.display()))?;

    // Acquire exclusive lock before replacing the file
    lock.lock_exclusive().context("Failed to acquire file lock")?;

    let mut tmp = NamedTempFile::new_in(dir)
        .wrap_err_with(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        tmp.write_all(b"\n")?;
    }
    tmp.as_file().sync_all()?;

    tmp.persist(path)
        .wrap_err_with(|| format!("Failed to replace snapshot file {}", path.display()))?;

    info!(file = ?path, bytes = text.len(), "Wrote snapshot file");

    // Lock is automatically released when the lock file is dropped
    Ok(())
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Status, TaskId};
    use tempfile::TempDir;

    const SAMPLE: &str = r#"[
  {"id": 1, "text": "Buy milk", "status": "Pending"},
  {"id": "abc", "text": "Write report", "status": "Completed"}
]"#;

    #[test]
    fn test_decode_mixed_ids() {
        let tasks = decode(SAMPLE).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id(), &TaskId::from(1u64));
        assert_eq!(tasks[0].text(), "Buy milk");
        assert_eq!(tasks[1].id(), &TaskId::from("abc"));
        assert_eq!(tasks[1].status(), Status::Completed);
    }

    #[test]
    fn test_decode_legacy_completed_label() {
        let tasks = decode(r#"[{"id": 1, "text": "Old", "status": "That's Completed"}]"#).unwrap();
        assert_eq!(tasks[0].status(), Status::Completed);

        let text = encode(&tasks).unwrap();
        assert!(text.contains("\"Completed\""));
        assert!(!text.contains("That's"));
    }

    #[test]
    fn test_decode_not_json() {
        assert!(matches!(decode("not json"), Err(ParseError::Syntax(_))));
    }

    #[test]
    fn test_decode_wrong_shape() {
        assert!(matches!(decode(r#"{"id": 1}"#), Err(ParseError::Syntax(_))));
        assert!(matches!(decode(r#"[{"id": 1, "text": "a"}]"#), Err(ParseError::Syntax(_))));
        assert!(matches!(
            decode(r#"[{"id": 1, "text": "a", "status": "Done"}]"#),
            Err(ParseError::Syntax(_))
        ));
    }

    #[test]
    fn test_decode_rejects_duplicate_ids() {
        let text = r#"[
  {"id": 1, "text": "a", "status": "Pending"},
  {"id": 1, "text": "b", "status": "Pending"}
]"#;
        match decode(text) {
            Err(ParseError::DuplicateId(id)) => assert_eq!(id, TaskId::from(1u64)),
            other => panic!("expected DuplicateId, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_numeric_and_string_ids_are_distinct() {
        let text = r#"[
  {"id": 1, "text": "a", "status": "Pending"},
  {"id": "1", "text": "b", "status": "Pending"}
]"#;
        assert_eq!(decode(text).unwrap().len(), 2);
    }

    #[test]
    fn test_decode_rejects_bad_text() {
        let empty = r#"[{"id": 1, "text": "  ", "status": "Pending"}]"#;
        assert!(matches!(decode(empty), Err(ParseError::EmptyText { index: 0 })));

        let long = format!(r#"[{{"id": 1, "text": "{}", "status": "Pending"}}]"#, "x".repeat(81));
        assert!(matches!(
            decode(&long),
            Err(ParseError::TextTooLong { index: 0, len: 81 })
        ));
    }

    #[test]
    fn test_encode_is_pretty_and_ordered() {
        let tasks = decode(SAMPLE).unwrap();
        let text = encode(&tasks).unwrap();
        assert!(text.starts_with("[\n  {\n    \"id\": 1,"));
        assert!(text.find("Buy milk").unwrap() < text.find("Write report").unwrap());
        assert_eq!(decode(&text).unwrap(), tasks);
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(&[]).unwrap(), EMPTY_SNAPSHOT);
    }

    #[test]
    fn test_read_text_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.json");

        assert_eq!(read_text(&path).unwrap(), EMPTY_SNAPSHOT);
    }

    #[test]
    fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_FILE_NAME);

        write_text(&path, SAMPLE).unwrap();
        let text = read_text(&path).unwrap();
        assert_eq!(decode(&text).unwrap(), decode(SAMPLE).unwrap());
    }

    #[test]
    fn test_write_replaces_longer_contents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_FILE_NAME);

        write_text(&path, SAMPLE).unwrap();
        write_text(&path, EMPTY_SNAPSHOT).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[test]
    fn test_write_replaces_file_instead_of_truncating() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_FILE_NAME);
        let old_link = temp.path().join("old.json");

        write_text(&path, SAMPLE).unwrap();
        fs::hard_link(&path, &old_link).unwrap();

        write_text(&path, EMPTY_SNAPSHOT).unwrap();

        // The previous file was never rewritten in place
        assert_eq!(fs::read_to_string(&old_link).unwrap(), format!("{}\n", SAMPLE));
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[test]
    fn test_write_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_FILE_NAME);

        write_text(&path, SAMPLE).unwrap();
        write_text(&path, SAMPLE).unwrap();

        let mut names: Vec<String> = fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["todos.json".to_string(), "todos.json.lock".to_string()]);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join(DEFAULT_FILE_NAME);

        assert!(write_text(&path, SAMPLE).is_err());
        assert!(!path.exists());
    }
}
