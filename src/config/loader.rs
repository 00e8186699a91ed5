//! Configuration loading from disk.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::config::schema::BridgeConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::convert::ConverterRegistry;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    let mut out = String::new();
    for (i, err) in errors.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{err}");
    }
    out
}

/// Load and validate configuration from a TOML file, resolving converter
/// names against the global registry.
pub fn load_config(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    tracing::info!(path = %path.display(), outbound = config.outbound.len(), "Bridge configuration loaded");
    Ok(config)
}

/// Parse and validate a TOML document against the global registry.
pub fn parse_config(content: &str) -> Result<BridgeConfig, ConfigError> {
    parse_config_with(content, ConverterRegistry::global())
}

/// Parse and validate a TOML document against `registry`.
pub fn parse_config_with(content: &str, registry: &ConverterRegistry) -> Result<BridgeConfig, ConfigError> {
    let config: BridgeConfig = toml::from_str(content)?;
    validate_config(&config, registry).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_valid_document() {
        let config = parse_config_with(
            "[[outbound]]\nlogger = \"foo\"\n",
            &ConverterRegistry::new(),
        )
        .unwrap();
        assert_eq!(config.outbound[0].logger, "foo");
    }

    #[test]
    fn test_syntax_error() {
        let err = parse_config_with("[inbound", &ConverterRegistry::new()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_lists_every_problem() {
        let err = parse_config_with(
            "[[outbound]]\nlogger = \"x\"\n[[outbound]]\nlogger = \"x\"\nlevel_converter = \"nope\"\n",
            &ConverterRegistry::new(),
        )
        .unwrap_err();

        let ConfigError::Validation(errors) = &err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.len(), 2);
        let text = err.to_string();
        assert!(text.contains("nope"));
        assert!(text.contains("more than once"));
    }

    #[test]
    fn test_missing_file() {
        let path = PathBuf::from("/nonexistent/logbridge.toml");
        assert!(matches!(load_config(&path), Err(ConfigError::Io(_))));
    }
}
