//! Bidirectional bridge between two logging models.
//!
//! The *category* model (`category`) has hierarchical loggers, additive
//! appenders and log4j-style levels. The *platform* model (`platform`) has a
//! log manager, handlers, filters and JUL-style levels. Installing the bridge
//! sends everything logged on the platform side into category appenders;
//! attaching an [`OutboundAppender`] sends category events the other way. No
//! event ever crosses twice.
//!
//! ```no_run
//! use logbridge::{category::Hierarchy, platform::LogManager};
//!
//! logbridge::assimilate();
//! // Delivered to the category appenders of "app.db" and its ancestors.
//! if let Some(logger) = LogManager::global().get_logger("app.db") {
//!     logger.warning("pool exhausted");
//! }
//! Hierarchy::global().get_logger("app.db").info("category-side events are unaffected");
//! logbridge::repatriate();
//! ```

pub mod bridge;
pub mod category;
pub mod config;
pub mod convert;
pub mod lifecycle;
pub mod observability;
pub mod platform;

pub use bridge::{BridgeFilter, InboundHandler, OutboundAppender};
pub use config::BridgeConfig;
pub use convert::{ConverterRegistry, DefaultLevelConverter, EventConverter, LevelConverter};
pub use lifecycle::{assimilate, global_bridge, repatriate, Bridge, BridgeError, Installation};
