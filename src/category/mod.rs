//! Category logging model.
//!
//! # Data Flow
//! ```text
//! Logger::log(level, msg)
//!     → effective level gate (own level or nearest configured ancestor)
//!     → LoggingEvent
//!     → call_appenders: logger's appenders, then ancestors while additive
//!
//! Logger::inject(event)            (events arriving from the platform bridge)
//!     → no level gate
//!     → same appender walk, bridging appenders skipped
//! ```
//!
//! # Levels
//! ALL < TRACE < DEBUG < INFO < WARN < ERROR < FATAL < OFF

pub mod event;
pub mod hierarchy;
pub mod level;

pub use event::{Location, LoggingEvent};
pub use hierarchy::{Appender, Hierarchy, Layout, Logger, DEFAULT_ROOT_LEVEL};
pub use level::{Level, ParseLevelError};
