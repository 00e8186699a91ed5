//! Platform logging model.
//!
//! # Data Flow
//! ```text
//! Logger::log(level, msg)
//!     → level gate (effective level, OFF disables)
//!     → LogRecord
//!     → logger filter (is_loggable)
//!     → handlers of the logger, then parents while use_parent_handlers
//!
//! Logger::inject(record)           (records arriving from the category bridge)
//!     → level gate
//!     → logger filter (is_loggable_injected)
//!     → same handler walk, bridging handlers skipped
//! ```
//!
//! # Levels
//! ALL < FINEST < FINER < FINE < CONFIG < INFO < WARNING < SEVERE < OFF

pub mod level;
pub mod manager;
pub mod record;

pub use level::{Level, ParseLevelError};
pub use manager::{Filter, Handler, LogManager, Logger, DEFAULT_ROOT_LEVEL};
pub use record::LogRecord;
