//! Journal monitor error types.

use std::path::PathBuf;

/// Errors that can occur while monitoring the journal directory.
#[derive(thiserror::Error, Debug)]
pub enum JournalError {
    /// Journal directory missing or not a directory.
    #[error("Journal directory not found: {0}")]
    MissingDirectory(PathBuf),

    /// No file matching the journal naming convention exists yet.
    #[error("No journal files in {0}")]
    NoJournalFiles(PathBuf),

    /// Tailed file was deleted out from under us.
    #[error("Journal file deleted: {0}")]
    FileDeleted(PathBuf),

    /// Permission denied accessing a journal file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Notify watcher error.
    #[error("File watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from decoding a single journal line.
///
/// All of these are transient-skip at the pipeline level: the line is
/// discarded and tailing continues.
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    /// Line is not valid JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Line parsed but is not a JSON object.
    #[error("Journal line is not an object")]
    NotAnObject,

    /// Record carries no `event` discriminator.
    #[error("Journal record missing `event` field")]
    MissingEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_display() {
        let err = JournalError::MissingDirectory(PathBuf::from("/tmp/nope"));
        assert_eq!(err.to_string(), "Journal directory not found: /tmp/nope");
    }

    #[test]
    fn test_no_journal_files_display() {
        let err = JournalError::NoJournalFiles(PathBuf::from("/tmp/logs"));
        assert_eq!(err.to_string(), "No journal files in /tmp/logs");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: JournalError = io_err.into();
        assert!(matches!(err, JournalError::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_decode_error_missing_event() {
        let err = DecodeError::MissingEvent;
        assert_eq!(err.to_string(), "Journal record missing `event` field");
    }
}
