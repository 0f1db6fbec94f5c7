//! Journal monitor composition root.
//!
//! Owns the rotation watcher, the file tailer, the cumulative state, and
//! the FIFO queue of processed events. The tail loop runs as a background
//! tokio task on a fixed poll interval; rotation is push-notified and
//! applied at the top of each tick.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::discovery::find_active_journal;
use super::error::JournalError;
use super::event::JournalEvent;
use super::state::JournalState;
use super::tailer::JournalTailer;
use super::watcher::RotationWatcher;

/// Default poll interval for the tail loop.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Monitor lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MonitorStatus {
    #[default]
    Stopped,
    Starting,
    Running,
}

/// State and queue guarded together: the reducer runs on the tail task
/// while the consumer pops records, so one lock covers both.
#[derive(Debug, Default)]
struct Shared {
    state: JournalState,
    queue: VecDeque<JournalEvent>,
}

/// Handles owned only while the monitor is running.
struct TailHandle {
    cancel: CancellationToken,
    task: tokio::task::JoinHandle<()>,
    // Dropping stops the OS watch.
    _watcher: RotationWatcher,
}

/// Follows the active journal file and reduces its events into a state
/// snapshot plus an output queue.
pub struct JournalMonitor {
    journal_dir: PathBuf,
    poll_interval: Duration,
    shared: Arc<Mutex<Shared>>,
    status: MonitorStatus,
    handle: Option<TailHandle>,
}

impl JournalMonitor {
    /// Create a stopped monitor for a journal directory.
    #[must_use]
    pub fn new(journal_dir: PathBuf) -> Self {
        Self::with_poll_interval(journal_dir, DEFAULT_POLL_INTERVAL)
    }

    /// Create a stopped monitor with a custom tail poll interval.
    #[must_use]
    pub fn with_poll_interval(journal_dir: PathBuf, poll_interval: Duration) -> Self {
        Self {
            journal_dir,
            poll_interval,
            shared: Arc::new(Mutex::new(Shared::default())),
            status: MonitorStatus::default(),
            handle: None,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> MonitorStatus {
        self.status
    }

    /// Start watching and tailing.
    ///
    /// Selects the greatest-sequence journal file, begins tailing it from
    /// offset zero, and starts rotation watching. Already-running monitors
    /// are left alone.
    ///
    /// # Errors
    ///
    /// Fails (returning to `Stopped`, no internal retry) if the journal
    /// directory is absent or unreadable, no journal file exists yet, or
    /// the directory cannot be watched. The caller may call `start()`
    /// again later.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn start(&mut self) -> Result<(), JournalError> {
        if self.handle.is_some() {
            return Ok(());
        }
        self.status = MonitorStatus::Starting;

        let startup = (|| {
            let active = find_active_journal(&self.journal_dir)?;
            let watcher = RotationWatcher::new(&self.journal_dir)?;
            Ok::<_, JournalError>((active, watcher))
        })();
        let (active, (watcher, rotation_rx)) = match startup {
            Ok(parts) => parts,
            Err(e) => {
                self.status = MonitorStatus::Stopped;
                return Err(e);
            }
        };

        // State is rebuilt from the current log file only; no persistence
        // across starts.
        {
            let mut shared = self.shared.lock().expect("monitor lock poisoned");
            shared.state = JournalState::new();
            shared.queue.clear();
        }

        tracing::info!(path = %active.display(), "Tailing journal");

        let cancel = CancellationToken::new();
        let task = tokio::spawn(tail_loop(
            JournalTailer::new(active),
            rotation_rx,
            Arc::clone(&self.shared),
            cancel.clone(),
            self.poll_interval,
        ));

        self.handle = Some(TailHandle {
            cancel,
            task,
            _watcher: watcher,
        });
        self.status = MonitorStatus::Running;
        Ok(())
    }

    /// Stop tailing and release the file handle and watch.
    ///
    /// Idempotent from any state; safe to call while a tail cycle is in
    /// flight (the tailer checks the cancellation token between lines).
    pub async fn stop(&mut self) {
        self.status = MonitorStatus::Stopped;
        if let Some(handle) = self.handle.take() {
            handle.cancel.cancel();
            if handle.task.await.is_err() {
                tracing::warn!("Tail task panicked during shutdown");
            }
        }
    }

    /// Pull the next processed event, FIFO, without blocking.
    ///
    /// `None` means "no event since the last pull", not an error.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn next_event(&self) -> Option<JournalEvent> {
        self.shared
            .lock()
            .expect("monitor lock poisoned")
            .queue
            .pop_front()
    }

    /// Read-only snapshot of the cumulative state.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn state(&self) -> JournalState {
        self.shared
            .lock()
            .expect("monitor lock poisoned")
            .state
            .clone()
    }
}

/// The tail loop: poll, apply pending rotation, read, reduce, enqueue.
async fn tail_loop(
    mut tailer: JournalTailer,
    rotation_rx: Receiver<PathBuf>,
    shared: Arc<Mutex<Shared>>,
    cancel: CancellationToken,
    poll_interval: Duration,
) {
    let mut interval = tokio::time::interval(poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        // Rotation: the latest notification wins. The superseded handle's
        // untailed remainder is discarded, not flushed into the new stream.
        while let Ok(path) = rotation_rx.try_recv() {
            if path != *tailer.path() {
                tracing::info!(path = %path.display(), "Switching to rotated journal");
                tailer = JournalTailer::new(path);
            }
        }

        match tailer.read_new_events(&cancel).await {
            Ok(events) => {
                for mut event in events {
                    // One lock scope per reduce-and-enqueue step; never
                    // held across the read above.
                    let mut shared = shared.lock().expect("monitor lock poisoned");
                    shared.state.reduce(&mut event);
                    shared.queue.push_back(event);
                }
            }
            Err(e) => {
                tracing::warn!(path = %tailer.path().display(), error = %e, "Tail cycle failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_starts_stopped() {
        let monitor = JournalMonitor::new(PathBuf::from("/tmp"));
        assert_eq!(monitor.status(), MonitorStatus::Stopped);
        assert!(monitor.next_event().is_none());
    }

    #[tokio::test]
    async fn test_start_fails_on_missing_directory() {
        let mut monitor = JournalMonitor::new(PathBuf::from("/tmp/edwatch-no-dir-4321"));
        let err = monitor.start().unwrap_err();
        assert!(matches!(err, JournalError::MissingDirectory(_)));
        assert_eq!(monitor.status(), MonitorStatus::Stopped);
    }

    #[tokio::test]
    async fn test_start_fails_on_empty_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut monitor = JournalMonitor::new(dir.path().to_path_buf());
        let err = monitor.start().unwrap_err();
        assert!(matches!(err, JournalError::NoJournalFiles(_)));
        assert_eq!(monitor.status(), MonitorStatus::Stopped);
    }

    #[tokio::test]
    async fn test_stop_is_idempotent_from_stopped() {
        let mut monitor = JournalMonitor::new(PathBuf::from("/tmp"));
        monitor.stop().await;
        monitor.stop().await;
        assert_eq!(monitor.status(), MonitorStatus::Stopped);
    }
}
