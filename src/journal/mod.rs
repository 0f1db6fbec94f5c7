//! Journal monitor: discovery, tailing, and incremental state reduction.
//!
//! The game appends line-delimited JSON records to rotated journal files.
//! This module finds the active file, follows it, reduces every event into
//! a [`JournalState`] snapshot, and queues the (possibly augmented) records
//! for the consumer.

mod discovery;
mod error;
mod event;
mod monitor;
mod state;
mod tailer;
mod watcher;

pub use discovery::{find_active_journal, is_journal_file, rotation_key, RotationKey};
pub use error::{DecodeError, JournalError};
pub use event::{EventKind, JournalEvent};
pub use monitor::{JournalMonitor, MonitorStatus, DEFAULT_POLL_INTERVAL};
pub use state::JournalState;
pub use tailer::JournalTailer;
pub use watcher::RotationWatcher;
