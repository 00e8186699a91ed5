//! Event translation between the category and platform models.

use std::sync::Arc;

use super::level::{DefaultLevelConverter, LevelConverter};
use crate::category::{Location, LoggingEvent};
use crate::platform::{record::next_sequence, LogRecord};

/// Logger name given to platform records that carry none.
pub const UNKNOWN_LOGGER_NAME: &str = "unknown.platform.logger";

/// Builds one model's event from the other's. Messages are copied verbatim;
/// only the level is translated.
#[derive(Debug, Clone)]
pub struct EventConverter {
    levels: Arc<dyn LevelConverter>,
}

impl EventConverter {
    pub fn new(levels: Arc<dyn LevelConverter>) -> Self {
        Self { levels }
    }

    pub fn level_converter(&self) -> &Arc<dyn LevelConverter> {
        &self.levels
    }

    /// Platform record → category event.
    pub fn to_category(&self, record: &LogRecord) -> LoggingEvent {
        let location = if record.source_module.is_none() && record.source_function.is_none() {
            None
        } else {
            Some(Location {
                module: record.source_module.clone(),
                function: record.source_function.clone(),
            })
        };

        LoggingEvent {
            logger_name: record
                .logger_name()
                .unwrap_or(UNKNOWN_LOGGER_NAME)
                .to_string(),
            level: self.levels.to_category(record.level),
            message: record.message.clone(),
            timestamp: record.timestamp,
            thread_name: record.thread_name.clone(),
            location,
        }
    }

    /// Category event → platform record, with a fresh sequence number.
    pub fn to_platform(&self, event: &LoggingEvent) -> LogRecord {
        let (source_module, source_function) = match &event.location {
            Some(location) => (location.module.clone(), location.function.clone()),
            None => (None, None),
        };

        LogRecord {
            level: self.levels.to_platform(event.level),
            message: event.message.clone(),
            logger_name: Some(event.logger_name.clone()),
            timestamp: event.timestamp,
            sequence: next_sequence(),
            thread_name: event.thread_name.clone(),
            source_module,
            source_function,
        }
    }
}

impl Default for EventConverter {
    fn default() -> Self {
        Self::new(Arc::new(DefaultLevelConverter))
    }
}
