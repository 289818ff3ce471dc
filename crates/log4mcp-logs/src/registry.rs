//! Name to logger mapping with lazy creation.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::logger::{Logger, SharedLogger};
use crate::types::Severity;

/// Default capacity for newly created loggers.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Settings applied to every logger the registry creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggerDefaults {
    /// Maximum entries retained per logger.
    pub max_entries: usize,
    /// Initial threshold of new loggers.
    pub default_level: Severity,
}

impl LoggerDefaults {
    /// Creates logger defaults.
    #[must_use]
    pub const fn new(max_entries: usize, default_level: Severity) -> Self {
        Self {
            max_entries,
            default_level,
        }
    }
}

impl Default for LoggerDefaults {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, Severity::Info)
    }
}

/// Registry owning every logger for the lifetime of the process.
///
/// Loggers are created on first reference and never removed.
#[derive(Debug, Default)]
pub struct LoggerRegistry {
    defaults: LoggerDefaults,
    loggers: RwLock<HashMap<String, SharedLogger>>,
}

impl LoggerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(defaults: LoggerDefaults) -> Self {
        Self {
            defaults,
            loggers: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the logger for `name`, creating it if it does not exist.
    pub fn get_or_create(&self, name: &str) -> SharedLogger {
        if let Some(logger) = self.loggers.read().get(name) {
            return Arc::clone(logger);
        }

        let mut loggers = self.loggers.write();
        let logger = loggers.entry(name.to_string()).or_insert_with(|| {
            debug!(logger = %name, max_entries = self.defaults.max_entries, "creating logger");
            Arc::new(Logger::new(
                name,
                self.defaults.max_entries,
                self.defaults.default_level,
            ))
        });
        Arc::clone(logger)
    }

    /// Returns the logger for `name` without creating it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<SharedLogger> {
        self.loggers.read().get(name).cloned()
    }

    /// Returns the number of distinct logger names seen so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.loggers.read().len()
    }

    /// Returns all logger names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the defaults used for new loggers.
    #[must_use]
    pub const fn defaults(&self) -> LoggerDefaults {
        self.defaults
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntryMetadata, LogFilter};
    use std::thread;

    #[test]
    fn get_or_create_is_lazy_and_stable() {
        let registry = LoggerRegistry::new(LoggerDefaults::new(5, Severity::Warn));
        assert_eq!(registry.count(), 0);
        assert!(registry.get("app").is_none());

        let first = registry.get_or_create("app");
        let second = registry.get_or_create("app");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn new_loggers_use_defaults() {
        let registry = LoggerRegistry::new(LoggerDefaults::new(7, Severity::Error));
        let logger = registry.get_or_create("db");
        assert_eq!(logger.capacity(), 7);
        assert_eq!(logger.threshold(), Severity::Error);
        assert_eq!(registry.defaults().max_entries, 7);
    }

    #[test]
    fn loggers_are_isolated() {
        let registry = LoggerRegistry::default();
        registry
            .get_or_create("a")
            .append(Severity::Info, "in a", EntryMetadata::default());
        registry.get_or_create("b").clear();

        assert_eq!(registry.get_or_create("a").len(), 1);
        assert!(registry.get_or_create("b").is_empty());
        assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn empty_name_is_a_valid_key() {
        let registry = LoggerRegistry::default();
        registry.get_or_create("");
        assert_eq!(registry.count(), 1);
        assert!(registry.get("").is_some());
    }

    #[test]
    fn concurrent_creation_yields_one_logger() {
        let registry = Arc::new(LoggerRegistry::default());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    registry
                        .get_or_create("shared")
                        .append(Severity::Info, format!("m{i}"), EntryMetadata::default());
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread panicked");
        }

        assert_eq!(registry.count(), 1);
        assert_eq!(registry.get_or_create("shared").entries(&LogFilter::new()).len(), 8);
    }
}
