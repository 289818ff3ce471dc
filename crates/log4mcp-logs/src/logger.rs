//! Bounded, level-filtered entry buffer for a single logger name.
//!
//! A [`Logger`] owns the ordered history of one name. Every read and write
//! goes through one mutex, so appends are serialized: each call adds exactly
//! one entry and evicts at most one, and readers observe entries in append
//! order.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::trace;

use crate::types::{EntryMetadata, LogEntry, LogFilter, LogId, Severity};

/// Mutable state guarded by the logger's lock.
#[derive(Debug)]
struct LoggerState {
    threshold: Severity,
    entries: VecDeque<LogEntry>,
    next_id: u64,
}

/// Thread-safe bounded log buffer for one name.
#[derive(Debug)]
pub struct Logger {
    /// Logger name (may be empty)
    name: String,
    /// Maximum number of retained entries
    max_entries: usize,
    /// Threshold, entries and sequence counter
    state: Mutex<LoggerState>,
}

/// Shared logger handle.
pub type SharedLogger = Arc<Logger>;

impl Logger {
    /// Creates an empty logger.
    ///
    /// A `max_entries` of zero is raised to one so an accepted append is
    /// always observable until the next one.
    #[must_use]
    pub fn new(name: impl Into<String>, max_entries: usize, threshold: Severity) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            name: name.into(),
            max_entries,
            state: Mutex::new(LoggerState {
                threshold,
                entries: VecDeque::with_capacity(max_entries.min(1024)),
                next_id: 1,
            }),
        }
    }

    /// Appends an entry unless `level` is below the current threshold.
    ///
    /// Returns `true` if the entry was stored. When the buffer exceeds its
    /// capacity the single oldest entry is evicted.
    #[allow(clippy::significant_drop_tightening)]
    pub fn append(
        &self,
        level: Severity,
        message: impl Into<String>,
        metadata: EntryMetadata,
    ) -> bool {
        let mut state = self.state.lock();

        if !level.is_at_least(state.threshold) {
            trace!(
                logger = %self.name,
                %level,
                threshold = %state.threshold,
                "entry below threshold"
            );
            return false;
        }

        let id = LogId(state.next_id);
        state.next_id += 1;

        state.entries.push_back(LogEntry {
            id,
            timestamp: Utc::now(),
            level,
            message: message.into(),
            logger_id: self.name.clone(),
            metadata,
        });

        if state.entries.len() > self.max_entries {
            state.entries.pop_front();
        }

        true
    }

    /// Returns a snapshot of stored entries in insertion order.
    #[must_use]
    pub fn entries(&self, filter: &LogFilter) -> Vec<LogEntry> {
        let state = self.state.lock();
        let mut matched: Vec<LogEntry> = state
            .entries
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        drop(state);

        if let Some(limit) = filter.limit {
            let skip = matched.len().saturating_sub(limit);
            matched.drain(..skip);
        }
        matched
    }

    /// Removes every stored entry.
    pub fn clear(&self) {
        self.state.lock().entries.clear();
    }

    /// Replaces the threshold for subsequent appends.
    ///
    /// Entries already stored are kept regardless of the new threshold.
    pub fn set_threshold(&self, threshold: Severity) {
        self.state.lock().threshold = threshold;
    }

    /// Returns the current threshold.
    #[must_use]
    pub fn threshold(&self) -> Severity {
        self.state.lock().threshold
    }

    /// Returns the logger name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the maximum number of retained entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.max_entries
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }
}
