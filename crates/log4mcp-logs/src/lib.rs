//! # log4mcp-logs
//!
//! Storage primitives for the Log4MCP logging service.
//!
//! This crate provides:
//!
//! - [`Severity`] - Ordered severity levels (Trace through Fatal)
//! - [`LogEntry`] - Immutable log record with diagnostic metadata
//! - [`LogFilter`] - Read-side filter for logger snapshots
//! - [`Logger`] - Bounded, level-filtered, thread-safe entry buffer
//! - [`LoggerRegistry`] - Name to logger map with lazy creation
//!
//! ## Example
//!
//! ```rust
//! use log4mcp_logs::{EntryMetadata, LogFilter, LoggerDefaults, LoggerRegistry, Severity};
//!
//! let registry = LoggerRegistry::new(LoggerDefaults::new(3, Severity::Info));
//! let logger = registry.get_or_create("myapp");
//!
//! logger.append(Severity::Debug, "dropped below threshold", EntryMetadata::current());
//! logger.append(Severity::Error, "disk full", EntryMetadata::current());
//!
//! let entries = logger.entries(&LogFilter::new());
//! assert_eq!(entries.len(), 1);
//! assert_eq!(entries[0].message, "disk full");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod logger;
pub mod registry;
pub mod types;

// Re-export main types
pub use error::{LogError, Result};
pub use logger::{Logger, SharedLogger};
pub use registry::{DEFAULT_MAX_ENTRIES, LoggerDefaults, LoggerRegistry};
pub use types::{EntryMetadata, LogEntry, LogFilter, LogId, Severity};
