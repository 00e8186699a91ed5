//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every converter name is registered
//! - Reject empty appender names and duplicate outbound loggers
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function of the config and the converter registry
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use crate::config::schema::BridgeConfig;
use crate::convert::ConverterRegistry;

/// A semantic problem in an otherwise well-formed configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{section}: no level converter registered under {name:?}")]
    UnknownConverter { section: String, name: String },

    #[error("{section}: appender name must not be empty")]
    EmptyAppenderName { section: String },

    #[error("outbound logger {logger:?} is configured more than once")]
    DuplicateOutbound { logger: String },
}

/// Check `config` against `registry`, collecting every problem.
pub fn validate_config(
    config: &BridgeConfig,
    registry: &ConverterRegistry,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.inbound.enabled && !registry.contains(&config.inbound.level_converter) {
        errors.push(ValidationError::UnknownConverter {
            section: "inbound".to_string(),
            name: config.inbound.level_converter.clone(),
        });
    }

    let mut seen = HashSet::new();
    for (i, outbound) in config.outbound.iter().enumerate() {
        let section = format!("outbound[{i}]");

        if let Some(name) = &outbound.level_converter {
            if !registry.contains(name) {
                errors.push(ValidationError::UnknownConverter {
                    section: section.clone(),
                    name: name.clone(),
                });
            }
        }

        if outbound.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            errors.push(ValidationError::EmptyAppenderName { section });
        }

        if !seen.insert(outbound.logger.as_str()) {
            errors.push(ValidationError::DuplicateOutbound {
                logger: outbound.logger.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
