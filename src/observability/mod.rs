//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Bridge components produce:
//!     → diagnostics.rs (last-resort warnings: unresolved logger, unusable
//!       level, failing sink)
//!     → metrics.rs (forwarded / dropped counters, installation gauge)
//!
//! Consumers:
//!     → tracing subscriber installed by logging.rs (or by the host)
//!     → any `metrics` recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Diagnostics go through `tracing`, never through either bridged logging
//!   model, so a broken bridge cannot report into itself
//! - Normal level filtering is not a diagnostic
//! - Metrics are no-ops until the host installs a recorder

pub mod diagnostics;
pub mod logging;
pub mod metrics;
