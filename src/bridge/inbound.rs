//! Platform → category forwarding.
//!
//! # Responsibilities
//! - Receive every record that reaches the platform root
//! - Convert it, find the category logger of the same name and apply that
//!   logger's effective level, once
//! - Hand accepted events to the category appenders
//!
//! # Design Decisions
//! - Registered as a bridging handler, so records the outbound bridge injects
//!   into the platform never reach it
//! - Nothing escapes `publish`: a panicking converter or appender costs one
//!   event and one diagnostic

use std::panic::{catch_unwind, AssertUnwindSafe};

use super::resolver::LoggerResolver;
use crate::category::{Hierarchy, Level};
use crate::convert::EventConverter;
use crate::observability::diagnostics::{self, Diagnostic};
use crate::observability::metrics::{self, Direction};
use crate::platform::{Handler, LogRecord};

/// Outcome of forwarding one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forwarded {
    /// Delivered to this many category appenders.
    Delivered(usize),
    /// Below the category logger's effective level.
    Filtered,
    /// Dropped after a diagnostic.
    Dropped,
}

/// Platform handler that republishes records into the category hierarchy.
#[derive(Debug, Clone)]
pub struct InboundHandler {
    converter: EventConverter,
    resolver: LoggerResolver,
}

impl InboundHandler {
    pub fn new(hierarchy: Hierarchy, converter: EventConverter) -> Self {
        Self {
            converter,
            resolver: LoggerResolver::new(hierarchy),
        }
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        self.resolver.hierarchy()
    }

    /// Forward one record, reporting what happened.
    pub fn forward(&self, record: &LogRecord) -> Forwarded {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.try_forward(record)));
        match outcome {
            Ok(forwarded) => forwarded,
            Err(_) => {
                diagnostics::report(
                    Diagnostic::SinkPanicked,
                    format_args!(
                        "Dropped platform record #{} from {:?}: forwarding panicked",
                        record.sequence,
                        record.logger_name()
                    ),
                );
                metrics::record_dropped(Direction::Inbound, "panicked");
                Forwarded::Dropped
            }
        }
    }

    fn try_forward(&self, record: &LogRecord) -> Forwarded {
        let event = self.converter.to_category(record);
        if event.level == Level::OFF {
            diagnostics::report(
                Diagnostic::UnusableLevel,
                format_args!(
                    "Dropped platform record #{} from {}: level {} has no category equivalent",
                    record.sequence, event.logger_name, record.level
                ),
            );
            metrics::record_dropped(Direction::Inbound, "unusable_level");
            return Forwarded::Dropped;
        }

        let logger = self.resolver.resolve(record.logger_name());
        if !event.level.is_greater_or_equal(logger.effective_level()) {
            metrics::record_dropped(Direction::Inbound, "below_threshold");
            return Forwarded::Filtered;
        }

        let delivered = logger.inject(&event);
        metrics::record_forwarded(Direction::Inbound);
        Forwarded::Delivered(delivered)
    }
}

impl Handler for InboundHandler {
    fn publish(&self, record: &LogRecord) {
        self.forward(record);
    }

    fn bridges(&self) -> bool {
        true
    }
}
