//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve every configured converter
//! - Install the inbound bridge and attach the outbound appenders
//!
//! # Design Decisions
//! - Fail fast: any converter error is fatal
//! - Everything is resolved before anything is attached, so a failed startup
//!   changes neither registry

use std::path::Path;
use std::sync::Arc;

use super::install::{Bridge, BridgeOptions, Installation};
use crate::bridge::OutboundAppender;
use crate::category::{self, Appender};
use crate::config::{load_config, BridgeConfig, ConfigError};
use crate::convert::{ConverterError, ConverterRegistry, EventConverter};

/// Startup failure.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error(transparent)]
    Converter(#[from] ConverterError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// What [`apply`] attached.
#[derive(Debug, Default)]
pub struct Applied {
    /// Result of the inbound installation, `None` when disabled.
    pub inbound: Option<Installation>,

    /// Each outbound appender with the category logger it is attached to.
    pub outbound: Vec<(category::Logger, Arc<OutboundAppender>)>,
}

impl Applied {
    /// Detach every outbound appender. The inbound bridge is left to
    /// [`Bridge::repatriate`].
    pub fn detach_outbound(&self) -> usize {
        self.outbound
            .iter()
            .filter(|(logger, appender)| logger.remove_appender(&(appender.clone() as Arc<dyn Appender>)))
            .count()
    }
}

/// Apply `config` to `bridge`, resolving converter names in the global registry.
pub fn apply(config: &BridgeConfig, bridge: &Bridge) -> Result<Applied, BridgeError> {
    apply_with(config, bridge, ConverterRegistry::global())
}

/// Apply `config` to `bridge`, resolving converter names in `registry`.
pub fn apply_with(
    config: &BridgeConfig,
    bridge: &Bridge,
    registry: &ConverterRegistry,
) -> Result<Applied, BridgeError> {
    let inbound = if config.inbound.enabled {
        let converter = EventConverter::new(registry.create(&config.inbound.level_converter)?);
        Some(BridgeOptions {
            exclusive: config.inbound.exclusive,
            platform_root_level: config.inbound.root_level(),
            converter,
        })
    } else {
        None
    };

    let mut appenders = Vec::with_capacity(config.outbound.len());
    for entry in &config.outbound {
        let mut builder = OutboundAppender::builder()
            .manager(bridge.manager().clone())
            .registry(registry.clone());
        if let Some(name) = &entry.level_converter {
            builder = builder.level_converter_name(name.as_str());
        }
        if let Some(name) = &entry.name {
            builder = builder.name(name.as_str());
        }
        appenders.push((entry.logger.as_str(), Arc::new(builder.build()?)));
    }

    let mut applied = Applied {
        inbound: inbound
            .as_ref()
            .map(|options| bridge.install_with(config.inbound.install_mode, options)),
        outbound: Vec::with_capacity(appenders.len()),
    };

    for (name, appender) in appenders {
        let logger = bridge.hierarchy().get_logger(name);
        logger.add_appender(appender.clone());
        tracing::info!(category_logger = %logger.name(), "Outbound appender attached");
        applied.outbound.push((logger, appender));
    }

    Ok(applied)
}

/// Load the configuration at `path` and apply it.
pub fn start(path: &Path, bridge: &Bridge) -> Result<Applied, BridgeError> {
    let config = load_config(path)?;
    apply(&config, bridge)
}
