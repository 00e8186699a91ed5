//! Conversion between the two logging models.
//!
//! # Data Flow
//! ```text
//! configured name ──▶ registry.rs ──▶ Arc<dyn LevelConverter>
//!                                          │
//! LogRecord ────────▶ event.rs (EventConverter) ──▶ LoggingEvent
//! LoggingEvent ─────▶ event.rs (EventConverter) ──▶ LogRecord
//! ```
//!
//! # Design Decisions
//! - Converters are stateless values shared through `Arc`
//! - Custom converters are injected as values or registered by name; there is
//!   no fallback when a named converter cannot be built

pub mod event;
pub mod level;
pub mod registry;

pub use event::{EventConverter, UNKNOWN_LOGGER_NAME};
pub use level::{DefaultLevelConverter, LevelConverter};
pub use registry::{BoxError, ConverterError, ConverterRegistry, DEFAULT_CONVERTER};
