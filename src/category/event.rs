//! Category log events.

use std::time::SystemTime;

use super::Level;

/// Source location attached to an event, when the caller knows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Module (or class) that emitted the event.
    pub module: Option<String>,
    /// Function (or method) that emitted the event.
    pub function: Option<String>,
}

/// A single occurrence delivered to category appenders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingEvent {
    /// Name of the logger the event was emitted through.
    pub logger_name: String,
    pub level: Level,
    /// Fully rendered message text.
    pub message: String,
    pub timestamp: SystemTime,
    /// Name of the emitting thread.
    pub thread_name: String,
    pub location: Option<Location>,
}

impl LoggingEvent {
    /// Build an event stamped with the current time and thread.
    pub fn new(logger_name: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            logger_name: logger_name.into(),
            level,
            message: message.into(),
            timestamp: SystemTime::now(),
            thread_name: current_thread_name(),
            location: None,
        }
    }

    /// Attach a source location.
    pub fn with_location(mut self, module: Option<String>, function: Option<String>) -> Self {
        self.location = if module.is_none() && function.is_none() {
            None
        } else {
            Some(Location { module, function })
        };
        self
    }

    /// The message as rendered by the emitter.
    pub fn rendered_message(&self) -> &str {
        &self.message
    }
}

pub(crate) fn current_thread_name() -> String {
    let thread = std::thread::current();
    match thread.name() {
        Some(name) => name.to_string(),
        None => format!("{:?}", thread.id()),
    }
}
