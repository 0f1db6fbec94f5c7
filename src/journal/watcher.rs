//! Journal directory rotation watcher.
//!
//! Watches the journal directory for newly created journal files and
//! forwards their paths to the monitor, which switches the tailer over.
//! Directory events and files outside the naming convention are ignored.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self as std_mpsc, Receiver};
use std::time::Duration;

use notify_debouncer_full::{
    new_debouncer,
    notify::{EventKind, RecommendedWatcher, RecursiveMode},
    DebounceEventResult, Debouncer, RecommendedCache,
};

use super::discovery::is_journal_file;
use super::error::JournalError;

/// Debounce window for file-system events.
const DEBOUNCE: Duration = Duration::from_millis(250);

/// Push-notifies journal rotation: new matching files in the watched
/// directory are reported over the returned channel.
///
/// Dropping the watcher stops the underlying notify machinery.
pub struct RotationWatcher {
    // Held only to keep the OS watch registration alive.
    _debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
}

impl RotationWatcher {
    /// Start watching a journal directory for rotation.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Notify`] if the directory cannot be watched
    /// (absent, unreadable, or watcher limits); the monitor surfaces this as
    /// a failed `start()`.
    pub fn new(journal_dir: &Path) -> Result<(Self, Receiver<PathBuf>), JournalError> {
        let (tx, rx) = std_mpsc::channel();

        let mut debouncer = new_debouncer(DEBOUNCE, None, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    for event in &events {
                        if !matches!(event.kind, EventKind::Create(_)) {
                            continue;
                        }
                        for path in &event.paths {
                            if path.is_dir() || !is_journal_file(path) {
                                continue;
                            }
                            tracing::info!(path = %path.display(), "Journal rotation detected");
                            let _ = tx.send(path.clone());
                        }
                    }
                }
                Err(errors) => {
                    for error in errors {
                        tracing::error!(error = %error, "Journal directory watch error");
                    }
                }
            }
        })?;

        debouncer.watch(journal_dir, RecursiveMode::NonRecursive)?;

        Ok((Self { _debouncer: debouncer }, rx))
    }
}
