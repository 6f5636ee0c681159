//! Flat-file persistence for pets and appointments.
//!
//! Both files are line-oriented, fields separated by `", "`. Saving rewrites
//! the whole file. Loading decodes each line on its own: a bad line is logged,
//! recorded in the `LoadReport` and skipped, never fatal. A missing file loads
//! as empty.

pub mod appointment_file;
pub mod pet_file;

pub use appointment_file::*;
pub use pet_file::*;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::ValidationError;

/// Field separator used by both record formats.
pub const FIELD_SEPARATOR: &str = ", ";

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single persisted line was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LineError {
    #[error("expected at least {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("invalid date and time '{0}'")]
    InvalidDateTime(String),

    #[error("unknown status '{0}'")]
    UnknownStatus(String),

    #[error("pet not found: '{0}'")]
    UnknownPet(String),

    #[error("malformed pet type and breed '{0}'")]
    MalformedKind(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A rejected line, kept so the caller can report it.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLine {
    /// One-based line number in the file.
    pub line_number: usize,
    pub content: String,
    pub error: LineError,
}

/// Outcome of a tolerant load.
#[derive(Debug)]
pub struct LoadReport<T> {
    pub loaded: Vec<T>,
    pub skipped: Vec<SkippedLine>,
    /// `false` when the file did not exist.
    pub file_found: bool,
}

impl<T> LoadReport<T> {
    fn empty(file_found: bool) -> Self {
        Self {
            loaded: Vec::new(),
            skipped: Vec::new(),
            file_found,
        }
    }
}

/// Splits a record the way it was joined. Empty interior fields are kept.
pub(crate) fn split_fields(line: &str) -> Vec<&str> {
    line.split(FIELD_SEPARATOR).collect()
}

/// Reads `path` and decodes each non-blank line with `decode`.
pub(crate) fn load_lines<T, F>(
    path: &Path,
    kind: &'static str,
    mut decode: F,
) -> Result<LoadReport<T>, PersistenceError>
where
    F: FnMut(&str) -> Result<T, LineError>,
{
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "No previous {kind} data found");
            return Ok(LoadReport::empty(false));
        }
        Err(source) => {
            return Err(PersistenceError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut report = LoadReport::empty(true);
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match decode(line) {
            Ok(item) => report.loaded.push(item),
            Err(error) => {
                tracing::warn!(
                    line = index + 1,
                    error = %error,
                    "Skipping unreadable {kind} record"
                );
                report.skipped.push(SkippedLine {
                    line_number: index + 1,
                    content: line.to_string(),
                    error,
                });
            }
        }
    }

    tracing::info!(
        loaded = report.loaded.len(),
        skipped = report.skipped.len(),
        "Loaded {kind} records"
    );
    Ok(report)
}

/// Overwrites `path` with one line per record.
pub(crate) fn write_lines(path: &Path, lines: &[String]) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| PersistenceError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    let mut body = lines.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }

    std::fs::write(path, body).map_err(|source| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_empty_interior_fields() {
        assert_eq!(split_fields("a, , c"), vec!["a", "", "c"]);
        assert_eq!(split_fields("a,b"), vec!["a,b"]);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let report: LoadReport<String> =
            load_lines(&dir.path().join("absent.txt"), "test", |l| Ok(l.to_string())).unwrap();
        assert!(report.loaded.is_empty());
        assert!(report.skipped.is_empty());
        assert!(!report.file_found);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        std::fs::write(&path, "one\n\n   \ntwo\n").unwrap();
        let report: LoadReport<String> = load_lines(&path, "test", |l| Ok(l.to_string())).unwrap();
        assert_eq!(report.loaded, vec!["one", "two"]);
    }

    #[test]
    fn failing_lines_are_reported_with_line_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        std::fs::write(&path, "1\nx\n3\n").unwrap();
        let report = load_lines(&path, "test", |l| {
            l.parse::<i64>().map_err(|_| LineError::InvalidNumber(l.into()))
        })
        .unwrap();
        assert_eq!(report.loaded, vec![1, 3]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].line_number, 2);
        assert_eq!(report.skipped[0].error, LineError::InvalidNumber("x".into()));
    }

    #[test]
    fn write_creates_parent_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("f.txt");
        write_lines(&path, &["a".into(), "b".into()]).unwrap();
        write_lines(&path, &["c".into()]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "c\n");
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be read as a file.
        let result: Result<LoadReport<String>, _> =
            load_lines(dir.path(), "test", |l| Ok(l.to_string()));
        assert!(matches!(result, Err(PersistenceError::Read { .. })));
    }
}
