//! Bridge metrics.
//!
//! # Metrics
//! - `logbridge_events_forwarded_total` (counter): events handed to the other
//!   system, by `direction`
//! - `logbridge_events_dropped_total` (counter): events not forwarded, by
//!   `direction` and `reason`
//! - `logbridge_diagnostics_total` (counter): diagnostics, by `kind`
//! - `logbridge_inbound_installed` (gauge): 1 while the inbound bridge is attached
//!
//! # Design Decisions
//! - Label values are static strings; no per-logger labels, so cardinality
//!   stays fixed

use super::diagnostics::Diagnostic;

/// Which way an event crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Platform → category.
    Inbound,
    /// Category → platform.
    Outbound,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

pub fn record_forwarded(direction: Direction) {
    metrics::counter!("logbridge_events_forwarded_total", "direction" => direction.as_str()).increment(1);
}

pub fn record_dropped(direction: Direction, reason: &'static str) {
    metrics::counter!(
        "logbridge_events_dropped_total",
        "direction" => direction.as_str(),
        "reason" => reason
    )
    .increment(1);
}

pub fn record_diagnostic(kind: Diagnostic) {
    metrics::counter!("logbridge_diagnostics_total", "kind" => kind.as_str()).increment(1);
}

pub fn record_installed(installed: bool) {
    metrics::gauge!("logbridge_inbound_installed").set(if installed { 1.0 } else { 0.0 });
}
