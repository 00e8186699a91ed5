//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Resolve converters → Install inbound → Attach outbound
//!
//! Installation (install.rs):
//!     assimilate → detach platform root handlers → attach InboundHandler
//!     repatriate → detach InboundHandler → restore root handlers and level
//! ```
//!
//! # Design Decisions
//! - Ordered startup: nothing is attached until every converter resolved
//! - The process-wide bridge is an ordinary `Bridge` behind a `OnceLock`
//! - Installation state changes are serialized; forwarding never waits on them

pub mod install;
pub mod startup;

pub use install::{
    assimilate, global_bridge, repatriate, Bridge, BridgeOptions, InstallMode, Installation,
};
pub use startup::{apply, apply_with, start, Applied, BridgeError};
