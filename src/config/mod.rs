//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks against the converter registry)
//!     → BridgeConfig (validated, immutable)
//!     → lifecycle::startup::apply
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes mean repatriate and apply again
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, parse_config_with, ConfigError};
pub use schema::{BridgeConfig, InboundConfig, ObservabilityConfig, OutboundConfig};
pub use validation::{validate_config, ValidationError};
