//! Category → platform forwarding.
//!
//! # Responsibilities
//! - Receive events from the category loggers it is attached to
//! - Render, convert and publish them through the platform logger of the same
//!   name
//!
//! # Design Decisions
//! - Publication goes through `platform::Logger::inject`: the platform
//!   logger's level and filter still apply, bridging handlers are skipped
//! - A closed log manager is reported once per event and the event is dropped
//! - The converter is fixed when the appender is built; a configured name that
//!   cannot be resolved fails the build

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::category::{Appender, Layout, LoggingEvent};
use crate::convert::{ConverterError, ConverterRegistry, EventConverter, LevelConverter};
use crate::observability::diagnostics::{self, Diagnostic};
use crate::observability::metrics::{self, Direction};
use crate::platform::LogManager;

/// Category appender that republishes events into the platform manager.
pub struct OutboundAppender {
    name: Option<String>,
    manager: LogManager,
    converter: EventConverter,
    layout: Option<Arc<dyn Layout>>,
}

impl OutboundAppender {
    /// Appender over the global log manager with the default converter.
    pub fn new() -> Self {
        Self {
            name: None,
            manager: LogManager::global().clone(),
            converter: EventConverter::default(),
            layout: None,
        }
    }

    pub fn builder() -> OutboundAppenderBuilder {
        OutboundAppenderBuilder::default()
    }

    pub fn manager(&self) -> &LogManager {
        &self.manager
    }

    pub fn converter(&self) -> &EventConverter {
        &self.converter
    }

    fn forward(&self, event: &LoggingEvent) {
        let Some(logger) = self.manager.get_logger(&event.logger_name) else {
            diagnostics::report(
                Diagnostic::LoggerUnavailable,
                format_args!("Cannot obtain platform logger {:?}, dropping event", event.logger_name),
            );
            metrics::record_dropped(Direction::Outbound, "logger_unavailable");
            return;
        };

        let message = match &self.layout {
            Some(layout) => layout.format(event),
            None => event.rendered_message().to_string(),
        };
        let mut record = self.converter.to_platform(event);
        record.message = message;

        if logger.inject(record) > 0 {
            metrics::record_forwarded(Direction::Outbound);
        } else {
            metrics::record_dropped(Direction::Outbound, "not_published");
        }
    }
}

impl Appender for OutboundAppender {
    fn append(&self, event: &LoggingEvent) {
        if catch_unwind(AssertUnwindSafe(|| self.forward(event))).is_err() {
            diagnostics::report(
                Diagnostic::SinkPanicked,
                format_args!("Dropped event from {}: forwarding panicked", event.logger_name),
            );
            metrics::record_dropped(Direction::Outbound, "panicked");
        }
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn bridges(&self) -> bool {
        true
    }
}

impl Default for OutboundAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OutboundAppender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutboundAppender")
            .field("name", &self.name)
            .field("converter", self.converter.level_converter())
            .field("layout", &self.layout.is_some())
            .finish()
    }
}

enum ConverterChoice {
    Default,
    Instance(Arc<dyn LevelConverter>),
    Named(String),
}

/// Builder for [`OutboundAppender`].
#[derive(Default)]
pub struct OutboundAppenderBuilder {
    name: Option<String>,
    manager: Option<LogManager>,
    registry: Option<ConverterRegistry>,
    converter: Option<ConverterChoice>,
    layout: Option<Arc<dyn Layout>>,
}

impl OutboundAppenderBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Publish into this manager instead of the global one.
    pub fn manager(mut self, manager: LogManager) -> Self {
        self.manager = Some(manager);
        self
    }

    /// Resolve converter names here instead of in the global registry.
    pub fn registry(mut self, registry: ConverterRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn layout(mut self, layout: Arc<dyn Layout>) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn level_converter(mut self, converter: Arc<dyn LevelConverter>) -> Self {
        self.converter = Some(ConverterChoice::Instance(converter));
        self
    }

    /// Use the converter registered under `name`, resolved by [`build`](Self::build).
    pub fn level_converter_name(mut self, name: impl Into<String>) -> Self {
        self.converter = Some(ConverterChoice::Named(name.into()));
        self
    }

    pub fn build(self) -> Result<OutboundAppender, ConverterError> {
        let converter = match self.converter.unwrap_or(ConverterChoice::Default) {
            ConverterChoice::Default => EventConverter::default(),
            ConverterChoice::Instance(levels) => EventConverter::new(levels),
            ConverterChoice::Named(name) => {
                let registry = self.registry.unwrap_or_else(|| ConverterRegistry::global().clone());
                EventConverter::new(registry.create(&name)?)
            }
        };

        Ok(OutboundAppender {
            name: self.name,
            manager: self.manager.unwrap_or_else(|| LogManager::global().clone()),
            converter,
            layout: self.layout,
        })
    }
}

impl fmt::Debug for OutboundAppenderBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutboundAppenderBuilder")
            .field("name", &self.name)
            .field("layout", &self.layout.is_some())
            .finish()
    }
}
