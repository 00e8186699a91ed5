//! Last-resort warning channel.
//!
//! Used when a single event cannot be forwarded. Each report is one `tracing`
//! warning at target [`TARGET`] plus one increment of the diagnostics counter.

use std::fmt;

use super::metrics;

/// `tracing` target of every diagnostic.
pub const TARGET: &str = "logbridge::diagnostics";

/// Kinds of per-event failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    /// The target logging system handed out no logger.
    LoggerUnavailable,
    /// The converted event has no level it can be delivered at.
    UnusableLevel,
    /// A sink panicked while the bridge was delivering to it.
    SinkPanicked,
}

impl Diagnostic {
    pub fn as_str(self) -> &'static str {
        match self {
            Diagnostic::LoggerUnavailable => "logger_unavailable",
            Diagnostic::UnusableLevel => "unusable_level",
            Diagnostic::SinkPanicked => "sink_panicked",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emit one diagnostic warning.
pub fn report(kind: Diagnostic, message: impl fmt::Display) {
    tracing::warn!(target: TARGET, kind = kind.as_str(), "{}", message);
    metrics::record_diagnostic(kind);
}
