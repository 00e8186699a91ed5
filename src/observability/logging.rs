//! Structured logging for the bridge itself.
//!
//! # Responsibilities
//! - Initialize a `tracing` subscriber for hosts that have none
//! - Take the filter from `RUST_LOG`, else from configuration
//!
//! # Design Decisions
//! - Uses tracing-subscriber's registry with an `EnvFilter` and `fmt` layer
//! - Initialization is optional; libraries embedding the bridge keep their own
//!   subscriber and still see the bridge's events

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Install the global subscriber. Fails if one is already set.
pub fn init_logging(default_filter: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

/// Install the global subscriber using the configured filter.
pub fn init_from_config(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    init_logging(&config.log_filter)
}
