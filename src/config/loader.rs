//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::BridgeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that overrides `backend.base_url`.
pub const BASE_URL_ENV_VAR: &str = "DIRECTUS_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    #[error("HTTP client error: {0}")]
    Client(String),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: BridgeConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides, then re-validate.
pub fn apply_env(mut config: BridgeConfig) -> Result<BridgeConfig, ConfigError> {
    if let Ok(url) = std::env::var(BASE_URL_ENV_VAR) {
        if !url.trim().is_empty() {
            config.backend.base_url = url;
        }
    }
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join(format!("bridge-config-{}.toml", uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[collections]\nvehicles = \"Cars\"").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.collections.vehicles, "Cars");

        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let path = std::env::temp_dir().join(format!("bridge-config-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[timeouts]\nrequest_ms = 0\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("timeouts.request_ms"));

        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/bridge.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
