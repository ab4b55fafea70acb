//! Configuration validation.
//!
//! Serde handles syntax; this checks values. All problems are collected so
//! a bad file is reported in one pass.

use std::fmt;
use url::Url;

use crate::config::schema::BridgeConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.backend.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "backend.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("backend.base_url", e.to_string())),
    }

    if config.timeouts.request_ms == 0 {
        errors.push(ValidationError::new("timeouts.request_ms", "must be greater than 0"));
    }
    if config.timeouts.connect_ms == 0 {
        errors.push(ValidationError::new("timeouts.connect_ms", "must be greater than 0"));
    }

    let collections = [
        ("collections.vehicles", &config.collections.vehicles),
        ("collections.profiles", &config.collections.profiles),
        ("collections.probe", &config.collections.probe),
    ];
    for (field, name) in collections {
        if name.trim().is_empty() {
            errors.push(ValidationError::new(field, "must not be empty"));
        } else if name.contains('/') {
            errors.push(ValidationError::new(field, "must not contain '/'"));
        }
    }

    if config.defaults.account_role.trim().is_empty() {
        errors.push(ValidationError::new("defaults.account_role", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
