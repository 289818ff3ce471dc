//! Core value types for logger storage.
//!
//! This module provides:
//! - [`Severity`] - Totally ordered severity levels
//! - [`LogEntry`] - Immutable log record
//! - [`EntryMetadata`] - Diagnostic metadata attached to each record
//! - [`LogFilter`] - Read-side filter for snapshots
//! - [`LogId`] - Per-logger sequence number

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::LogError;

/// Per-logger sequence number, assigned in append order starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LogId(pub u64);

/// Log severity levels, ordered from most to least verbose.
///
/// The wire form is the upper-case level name (`"INFO"`). Parsing is
/// case-insensitive and accepts `WARNING` as a synonym for `WARN`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Most verbose, step-by-step tracing
    Trace = 0,
    /// Debugging information
    Debug = 1,
    /// General information
    #[default]
    Info = 2,
    /// Warning conditions
    Warn = 3,
    /// Error conditions
    Error = 4,
    /// Unrecoverable failures
    Fatal = 5,
}

impl Severity {
    /// All levels in ascending priority order.
    pub const ALL: [Self; 6] = [
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Fatal,
    ];

    /// Returns the integer priority (0 for Trace through 5 for Fatal).
    #[must_use]
    pub const fn priority(self) -> u8 {
        self as u8
    }

    /// Returns true if this level is at least as severe as `threshold`.
    #[must_use]
    pub fn is_at_least(self, threshold: Self) -> bool {
        self >= threshold
    }

    /// Returns the upper-case wire name of this level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Self::Trace),
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" | "WARNING" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            "FATAL" => Ok(Self::Fatal),
            _ => Err(LogError::UnknownSeverity(s.to_string())),
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Diagnostic metadata recorded with an entry. Has no behavioral effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// Identifier of the thread that stored the entry
    #[serde(default)]
    pub thread: String,
    /// Source file reported by the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Source line reported by the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Source function reported by the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
}

impl EntryMetadata {
    /// Captures the current thread with no source location.
    #[must_use]
    pub fn current() -> Self {
        let thread = std::thread::current();
        let thread = thread
            .name()
            .map_or_else(|| format!("{:?}", thread.id()), ToString::to_string);
        Self {
            thread,
            ..Self::default()
        }
    }

    /// Sets the source file.
    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Sets the source line.
    #[must_use]
    pub const fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Sets the source function.
    #[must_use]
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }
}

/// An immutable log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Sequence number within the owning logger
    pub id: LogId,
    /// When the entry was stored
    pub timestamp: DateTime<Utc>,
    /// Severity level
    pub level: Severity,
    /// The message text, stored verbatim
    pub message: String,
    /// Name of the owning logger
    pub logger_id: String,
    /// Diagnostic metadata
    #[serde(flatten)]
    pub metadata: EntryMetadata,
}

/// Filter applied when reading a logger snapshot.
///
/// `level` is an exact match: only entries stored with that very severity
/// are returned. Use `min_level` for "this level or higher".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    /// Keep only entries with exactly this severity
    pub level: Option<Severity>,
    /// Keep only entries at or above this severity
    pub min_level: Option<Severity>,
    /// Keep only the newest `limit` matching entries
    pub limit: Option<usize>,
}

impl LogFilter {
    /// Creates an empty filter that matches every entry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            level: None,
            min_level: None,
            limit: None,
        }
    }

    /// Restricts to entries with exactly `level`.
    #[must_use]
    pub const fn with_level(mut self, level: Severity) -> Self {
        self.level = Some(level);
        self
    }

    /// Restricts to entries at or above `level`.
    #[must_use]
    pub const fn with_min_level(mut self, level: Severity) -> Self {
        self.min_level = Some(level);
        self
    }

    /// Keeps only the newest `limit` matches.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Checks the severity criteria against one entry. `limit` is applied by
    /// the reader, not here.
    #[must_use]
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(level) = self.level {
            if entry.level != level {
                return false;
            }
        }
        if let Some(min) = self.min_level {
            if !entry.level.is_at_least(min) {
                return false;
            }
        }
        true
    }
}
