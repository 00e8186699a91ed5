//! The two forwarding directions.
//!
//! # Data Flow
//! ```text
//! platform Logger::log ─▶ root handlers ─▶ inbound.rs (InboundHandler)
//!                                               │ convert, resolver.rs, level gate
//!                                               ▼
//!                                       category Logger::inject ─▶ appenders
//!
//! category Logger::log ─▶ appenders ─▶ outbound.rs (OutboundAppender)
//!                                               │ layout, convert
//!                                               ▼
//!                                       platform Logger::inject ─▶ handlers
//! ```
//!
//! # Design Decisions
//! - Both bridges are bridging sinks, and both deliver through `inject`, which
//!   never calls a bridging sink: an event crosses at most once
//! - filter.rs is an alternative inbound path for one platform logger at a time

pub mod filter;
pub mod inbound;
pub mod outbound;
pub mod resolver;

pub use filter::BridgeFilter;
pub use inbound::{Forwarded, InboundHandler};
pub use outbound::{OutboundAppender, OutboundAppenderBuilder};
pub use resolver::LoggerResolver;
