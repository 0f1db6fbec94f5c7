//! Incremental journal file tailer.
//!
//! Reads newly appended lines from the active journal file, decoding each
//! into a [`JournalEvent`]. Malformed lines are skipped with a warning.

use std::path::PathBuf;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio_util::sync::CancellationToken;

use super::error::JournalError;
use super::event::JournalEvent;

/// Incremental reader that tracks its byte offset into one journal file.
///
/// Reads only lines appended since the last read, making it suitable for
/// following a file the game is still writing.
#[derive(Debug)]
pub struct JournalTailer {
    path: PathBuf,
    offset: u64,
}

impl JournalTailer {
    /// Create a tailer starting at the beginning of the file.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path, offset: 0 }
    }

    /// Current byte offset.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Path being tailed.
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read and decode events appended since the last read.
    ///
    /// The cancellation token is checked between lines so a concurrent
    /// `stop()` takes effect promptly but never mid-line. If the file
    /// shrank below our offset it was truncated in place; the offset resets
    /// to zero and reading restarts from the top.
    ///
    /// # Errors
    ///
    /// Returns an error if the file vanished, is unreadable, or I/O fails
    /// mid-read.
    pub async fn read_new_events(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<Vec<JournalEvent>, JournalError> {
        let file = match File::open(&self.path).await {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(JournalError::FileDeleted(self.path.clone()));
            }
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(JournalError::PermissionDenied(self.path.clone()));
            }
            Err(e) => return Err(JournalError::Io(e)),
        };

        let file_len = file.metadata().await?.len();
        if file_len < self.offset {
            tracing::warn!(
                path = %self.path.display(),
                old_offset = self.offset,
                new_len = file_len,
                "Journal file truncated, resetting offset"
            );
            self.offset = 0;
        }
        if file_len == self.offset {
            return Ok(Vec::new());
        }

        let mut file = file;
        file.seek(std::io::SeekFrom::Start(self.offset)).await?;

        let mut reader = BufReader::new(file);
        let mut events = Vec::new();
        let mut line = String::new();

        loop {
            if cancel.is_cancelled() {
                break;
            }

            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;
            if bytes_read == 0 {
                break;
            }
            // Only count complete lines; a partial trailing line (the game
            // mid-write) is left for the next tick.
            if !line.ends_with('\n') {
                break;
            }
            self.offset += bytes_read as u64;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match JournalEvent::from_line(trimmed) {
                Ok(event) => events.push(event),
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Skipping malformed journal line"
                    );
                }
            }
        }

        Ok(events)
    }
}
