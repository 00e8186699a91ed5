//! Configuration schema definitions.
//!
//! Every section and field has a default, so an empty file is a valid
//! configuration: inbound bridge on with the default converter, no outbound
//! appenders.

use serde::{Deserialize, Serialize};

use crate::convert::DEFAULT_CONVERTER;
use crate::lifecycle::InstallMode;
use crate::platform;

/// Root configuration for the bridge.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    /// Platform → category direction.
    pub inbound: InboundConfig,

    /// Category → platform appenders, one per category logger.
    pub outbound: Vec<OutboundConfig>,

    /// The bridge's own logging.
    pub observability: ObservabilityConfig,
}

/// Installation of the root inbound handler.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InboundConfig {
    pub enabled: bool,

    /// Registered name of the level converter.
    pub level_converter: String,

    /// What to do when the bridge is already installed.
    pub install_mode: InstallMode,

    /// Detach the platform root's existing handlers while installed.
    pub exclusive: bool,

    /// Replace the platform root level while installed.
    pub override_platform_root_level: bool,

    /// Level used when `override_platform_root_level` is set.
    pub platform_root_level: platform::Level,
}

impl Default for InboundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level_converter: DEFAULT_CONVERTER.to_string(),
            install_mode: InstallMode::KeepExisting,
            exclusive: true,
            override_platform_root_level: true,
            platform_root_level: platform::Level::ALL,
        }
    }
}

impl InboundConfig {
    /// The root level to install, if any.
    pub fn root_level(&self) -> Option<platform::Level> {
        self.override_platform_root_level
            .then_some(self.platform_root_level)
    }
}

/// One outbound appender.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct OutboundConfig {
    /// Category logger to attach to. Empty for the root.
    #[serde(default)]
    pub logger: String,

    /// Registered name of the level converter; the default when absent.
    #[serde(default)]
    pub level_converter: Option<String>,

    /// Appender name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Logging of the bridge itself.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: BridgeConfig = toml::from_str("").unwrap();
        assert!(config.inbound.enabled);
        assert!(config.inbound.exclusive);
        assert_eq!(config.inbound.level_converter, "default");
        assert_eq!(config.inbound.install_mode, InstallMode::KeepExisting);
        assert_eq!(config.inbound.root_level(), Some(platform::Level::ALL));
        assert!(config.outbound.is_empty());
        assert_eq!(config.observability.log_filter, "info");
    }

    #[test]
    fn test_full_document() {
        let config: BridgeConfig = toml::from_str(
            r#"
            [inbound]
            install_mode = "replace"
            exclusive = false
            platform_root_level = "fine"

            [[outbound]]
            logger = "com.example"
            level_converter = "strict"
            name = "to-platform"

            [[outbound]]

            [observability]
            log_filter = "logbridge=debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.inbound.install_mode, InstallMode::Replace);
        assert!(!config.inbound.exclusive);
        assert_eq!(config.inbound.root_level(), Some(platform::Level::FINE));
        assert_eq!(config.outbound.len(), 2);
        assert_eq!(config.outbound[0].level_converter.as_deref(), Some("strict"));
        assert_eq!(config.outbound[1].logger, "");
        assert_eq!(config.observability.log_filter, "logbridge=debug");
    }

    #[test]
    fn test_root_level_override_can_be_disabled() {
        let config: BridgeConfig =
            toml::from_str("[inbound]\noverride_platform_root_level = false").unwrap();
        assert_eq!(config.inbound.root_level(), None);
    }

    #[test]
    fn test_bad_level_is_a_parse_error() {
        assert!(toml::from_str::<BridgeConfig>("[inbound]\nplatform_root_level = \"LOUD\"").is_err());
    }
}
