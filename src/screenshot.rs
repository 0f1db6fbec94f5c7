//! Screenshot renaming for `Screenshot` events.
//!
//! The game writes screenshots with opaque sequential names and reports
//! them in the journal with a backslashed pseudo-path. Renaming stamps the
//! file with the body, coordinates, and capture time so a session's
//! screenshots sort usefully.

use std::path::Path;

/// Rename a reported screenshot inside the screenshots directory.
///
/// `filename` is the journal's reported name (a `\ED_Pictures\...` pseudo
/// path); `body` and `timestamp` come from the same event. With surface
/// coordinates the new name is `<body>_(<lat>_<long>)_<timestamp>.<ext>`,
/// otherwise `<body>_<timestamp>.<ext>`.
///
/// Returns the new filename, or `None` when the source file is missing or
/// the rename fails; either way the event pipeline continues.
#[must_use]
pub fn rename_screenshot(
    screenshots_dir: &Path,
    filename: &str,
    body: &str,
    timestamp: &str,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Option<String> {
    let filename = filename.rsplit('\\').next().unwrap_or(filename);
    let ext = filename.rsplit('.').next().unwrap_or("bmp");

    let body = body.replace(' ', "_");
    let timestamp = timestamp.replace(' ', "_").replace(':', "-");

    let new_filename = match (latitude, longitude) {
        (Some(lat), Some(long)) => {
            let coordinates = format!("{lat:.2}_{long:.2}").replace('.', "_");
            format!("{body}_({coordinates})_{timestamp}.{ext}")
        }
        _ => format!("{body}_{timestamp}.{ext}"),
    };

    let source = screenshots_dir.join(filename);
    let target = screenshots_dir.join(&new_filename);

    if !source.is_file() {
        tracing::warn!(path = %source.display(), "Screenshot file not found");
        return None;
    }

    match std::fs::rename(&source, &target) {
        Ok(()) => Some(new_filename),
        Err(e) => {
            tracing::warn!(
                from = %source.display(),
                to = %target.display(),
                error = %e,
                "Screenshot rename failed"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_rename_without_coordinates() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Screenshot_0001.bmp"), "bmp").unwrap();

        let renamed = rename_screenshot(
            dir.path(),
            r"\ED_Pictures\Screenshot_0001.bmp",
            "Merope 2 a",
            "2024-03-01 10:15:30",
            None,
            None,
        )
        .unwrap();

        assert_eq!(renamed, "Merope_2_a_2024-03-01_10-15-30.bmp");
        assert!(dir.path().join(&renamed).is_file());
        assert!(!dir.path().join("Screenshot_0001.bmp").exists());
    }

    #[test]
    fn test_rename_with_coordinates() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Screenshot_0002.bmp"), "bmp").unwrap();

        let renamed = rename_screenshot(
            dir.path(),
            r"\ED_Pictures\Screenshot_0002.bmp",
            "Merope 2 a",
            "2024-03-01 10:15:30",
            Some(12.345),
            Some(-6.789),
        )
        .unwrap();

        assert_eq!(renamed, "Merope_2_a_(12_35_-6_79)_2024-03-01_10-15-30.bmp");
        assert!(dir.path().join(&renamed).is_file());
    }

    #[test]
    fn test_missing_source_reports_failure() {
        let dir = TempDir::new().unwrap();
        let renamed = rename_screenshot(
            dir.path(),
            r"\ED_Pictures\Screenshot_0003.bmp",
            "Merope",
            "2024-03-01 10:15:30",
            None,
            None,
        );
        assert!(renamed.is_none());
    }
}
