//! Pass-through bridge for a single platform logger.
//!
//! # Responsibilities
//! - Copy every record a platform logger considers into a fixed category logger
//! - Leave the platform logger's own decision to the filter it replaced
//!
//! # Design Decisions
//! - Opt-in and per logger; the lifecycle manager never installs it
//! - Records reach the category logger through `inject`, so bridging appenders
//!   are skipped and the category level is not consulted again
//! - On injected dispatch only the wrapped decision is returned, so a record
//!   that came from the category side is never copied back
//! - Do not combine with the root [`super::InboundHandler`] on the same
//!   traffic: each record would be delivered twice

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::category;
use crate::convert::EventConverter;
use crate::observability::diagnostics::{self, Diagnostic};
use crate::observability::metrics::{self, Direction};
use crate::platform::{self, Filter, LogRecord};

/// Platform filter that forwards before delegating.
pub struct BridgeFilter {
    target: category::Logger,
    converter: EventConverter,
    wrapped: Option<Arc<dyn Filter>>,
}

impl BridgeFilter {
    /// Wrap `wrapped` (if any), forwarding to `target`.
    pub fn wrap(
        target: category::Logger,
        converter: EventConverter,
        wrapped: Option<Arc<dyn Filter>>,
    ) -> Self {
        Self {
            target,
            converter,
            wrapped,
        }
    }

    /// Install on `logger`, wrapping whatever filter it currently has.
    pub fn install_on(
        logger: &platform::Logger,
        target: category::Logger,
        converter: EventConverter,
    ) -> Arc<BridgeFilter> {
        let bridge = Arc::new(Self::wrap(target, converter, logger.filter()));
        logger.set_filter(Some(bridge.clone()));
        tracing::debug!(
            platform_logger = %logger.name(),
            category_logger = %bridge.target.name(),
            "Pass-through bridge installed"
        );
        bridge
    }

    /// Restore the wrapped filter. Returns false if `logger` no longer carries
    /// this bridge, in which case nothing changes.
    pub fn uninstall_from(self: &Arc<Self>, logger: &platform::Logger) -> bool {
        let ours = match logger.filter() {
            Some(current) => Arc::as_ptr(&current) as *const () == Arc::as_ptr(self) as *const (),
            None => false,
        };
        if !ours {
            return false;
        }
        logger.set_filter(self.wrapped.clone());
        tracing::debug!(platform_logger = %logger.name(), "Pass-through bridge removed");
        true
    }

    pub fn target(&self) -> &category::Logger {
        &self.target
    }

    pub fn wrapped(&self) -> Option<&Arc<dyn Filter>> {
        self.wrapped.as_ref()
    }

    fn delegate(&self, record: &LogRecord, injected: bool) -> bool {
        match &self.wrapped {
            Some(filter) if injected => filter.is_loggable_injected(record),
            Some(filter) => filter.is_loggable(record),
            None => true,
        }
    }

    fn forward(&self, record: &LogRecord) {
        let delivered = catch_unwind(AssertUnwindSafe(|| {
            let event = self.converter.to_category(record);
            self.target.inject(&event)
        }));
        match delivered {
            Ok(_) => metrics::record_forwarded(Direction::Inbound),
            Err(_) => {
                diagnostics::report(
                    Diagnostic::SinkPanicked,
                    format_args!(
                        "Dropped platform record #{} for category logger {}: forwarding panicked",
                        record.sequence,
                        self.target.name()
                    ),
                );
                metrics::record_dropped(Direction::Inbound, "panicked");
            }
        }
    }
}

impl Filter for BridgeFilter {
    fn is_loggable(&self, record: &LogRecord) -> bool {
        self.forward(record);
        self.delegate(record, false)
    }

    fn is_loggable_injected(&self, record: &LogRecord) -> bool {
        self.delegate(record, true)
    }
}

impl fmt::Debug for BridgeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeFilter")
            .field("target", &self.target.name())
            .field("wraps_filter", &self.wrapped.is_some())
            .finish()
    }
}
