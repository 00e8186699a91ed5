//! Platform log records.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use super::Level;
use crate::category::event::current_thread_name;

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// A single platform log occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: Level,
    /// Raw message text.
    pub message: String,
    /// Source logger name. Records built by hand may carry none.
    pub logger_name: Option<String>,
    pub timestamp: SystemTime,
    /// Process-wide, strictly increasing per record.
    pub sequence: u64,
    pub thread_name: String,
    pub source_module: Option<String>,
    pub source_function: Option<String>,
}

impl LogRecord {
    /// A record stamped with the current time, thread and the next sequence number.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            logger_name: None,
            timestamp: SystemTime::now(),
            sequence: next_sequence(),
            thread_name: current_thread_name(),
            source_module: None,
            source_function: None,
        }
    }

    pub fn with_logger_name(mut self, name: impl Into<String>) -> Self {
        self.logger_name = Some(name.into());
        self
    }

    pub fn with_source(mut self, module: Option<String>, function: Option<String>) -> Self {
        self.source_module = module;
        self.source_function = function;
        self
    }

    pub fn logger_name(&self) -> Option<&str> {
        self.logger_name.as_deref()
    }
}

pub(crate) fn next_sequence() -> u64 {
    NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_numbers_increase() {
        let first = LogRecord::new(Level::INFO, "a");
        let second = LogRecord::new(Level::INFO, "b");
        assert!(second.sequence > first.sequence);
    }

    #[test]
    fn test_builder_helpers() {
        let record = LogRecord::new(Level::FINE, "msg")
            .with_logger_name("a.b")
            .with_source(Some("module".into()), None);
        assert_eq!(record.logger_name(), Some("a.b"));
        assert_eq!(record.source_module.as_deref(), Some("module"));
        assert!(record.source_function.is_none());
    }
}
