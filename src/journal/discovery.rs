//! Journal file discovery.
//!
//! The game writes `Journal.<stamp>.<part>.log` files into a single
//! directory, rotating to a new part number (not zero-padded) within the
//! same session stamp. Selection orders by the embedded rotation sequence,
//! not by filename, so `Journal.X.10.log` sorts after `Journal.X.9.log`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::error::JournalError;

static JOURNAL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Journal\.(.+)\.(\d+)\.log$").expect("valid pattern"));

/// Rotation ordering key embedded in a journal filename.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RotationKey {
    /// Session timestamp segment, compared as written.
    pub stamp: String,
    /// Rotation part number, compared numerically.
    pub part: u64,
}

/// Parse a filename against the journal naming convention.
#[must_use]
pub fn rotation_key(filename: &str) -> Option<RotationKey> {
    let captures = JOURNAL_NAME.captures(filename)?;
    let stamp = captures[1].to_string();
    let part = captures[2].parse().ok()?;
    Some(RotationKey { stamp, part })
}

/// Whether a path names a journal file.
#[must_use]
pub fn is_journal_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(rotation_key)
        .is_some()
}

/// Find the active (greatest-sequence) journal file in a directory.
///
/// # Errors
///
/// Returns [`JournalError::MissingDirectory`] if the directory does not
/// exist or cannot be read, and [`JournalError::NoJournalFiles`] if no file
/// matches the naming convention. Both are reported failures the caller may
/// retry, not crashes.
pub fn find_active_journal(dir: &Path) -> Result<PathBuf, JournalError> {
    if !dir.is_dir() {
        return Err(JournalError::MissingDirectory(dir.to_path_buf()));
    }
    let entries = std::fs::read_dir(dir)
        .map_err(|_| JournalError::MissingDirectory(dir.to_path_buf()))?;

    entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| {
            let name = entry.file_name();
            let key = rotation_key(name.to_str()?)?;
            Some((key, entry.path()))
        })
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, path)| path)
        .ok_or_else(|| JournalError::NoJournalFiles(dir.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_rotation_key_parses_convention() {
        let key = rotation_key("Journal.2024-03-01T101530.01.log").unwrap();
        assert_eq!(key.stamp, "2024-03-01T101530");
        assert_eq!(key.part, 1);
    }

    #[test]
    fn test_rotation_key_rejects_other_names() {
        assert!(rotation_key("Journal.log").is_none());
        assert!(rotation_key("JournalBeta.2024-03-01T101530.01.log").is_none());
        assert!(rotation_key("Journal.2024-03-01T101530.01.cache").is_none());
        assert!(rotation_key("Status.json").is_none());
    }

    #[test]
    fn test_part_numbers_compare_numerically() {
        let nine = rotation_key("Journal.2024-03-01T101530.9.log").unwrap();
        let ten = rotation_key("Journal.2024-03-01T101530.10.log").unwrap();
        assert!(nine < ten);
    }

    #[test]
    fn test_stamp_orders_before_part() {
        let earlier = rotation_key("Journal.2024-03-01T101530.99.log").unwrap();
        let later = rotation_key("Journal.2024-03-02T080000.1.log").unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn test_is_journal_file() {
        assert!(is_journal_file(Path::new(
            "/logs/Journal.2024-03-01T101530.01.log"
        )));
        assert!(!is_journal_file(Path::new("/logs/Backpack.json")));
    }

    #[test]
    fn test_find_active_journal_picks_greatest_sequence() {
        let dir = TempDir::new().unwrap();
        for name in [
            "Journal.2024-03-01T101530.1.log",
            "Journal.2024-03-01T101530.9.log",
            "Journal.2024-03-01T101530.10.log",
            "Journal.2024-02-28T090000.99.log",
            "Status.json",
        ] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }

        let active = find_active_journal(dir.path()).unwrap();
        assert_eq!(
            active.file_name().unwrap(),
            "Journal.2024-03-01T101530.10.log"
        );
    }

    #[test]
    fn test_find_active_journal_empty_dir() {
        let dir = TempDir::new().unwrap();
        let err = find_active_journal(dir.path()).unwrap_err();
        assert!(matches!(err, JournalError::NoJournalFiles(_)));
    }

    #[test]
    fn test_find_active_journal_missing_dir() {
        let err = find_active_journal(Path::new("/tmp/edwatch-no-such-dir-1234")).unwrap_err();
        assert!(matches!(err, JournalError::MissingDirectory(_)));
    }
}
