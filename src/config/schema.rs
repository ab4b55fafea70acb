//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every section has defaults so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the bridge.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    /// Where the backend lives.
    pub backend: BackendConfig,

    /// Deadlines for remote calls.
    pub timeouts: TimeoutConfig,

    /// Collection names in the backend schema.
    pub collections: CollectionConfig,

    /// Values filled in on record creation.
    pub defaults: DefaultsConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Backend endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the Directus instance.
    pub base_url: String,

    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "https://directus.bryanmedin4.com".to_string(),
            user_agent: concat!("directus-bridge/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for a whole remote operation, in milliseconds.
    pub request_ms: u64,

    /// Connection establishment timeout, in milliseconds.
    pub connect_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_ms: 10_000,
            connect_ms: 5_000,
        }
    }
}

impl TimeoutConfig {
    pub fn request(&self) -> Duration {
        Duration::from_millis(self.request_ms)
    }

    pub fn connect(&self) -> Duration {
        Duration::from_millis(self.connect_ms)
    }
}

/// Collection names.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Vehicle records.
    pub vehicles: String,

    /// Internal user profile records.
    pub profiles: String,

    /// Collection read (limit 1) to probe whether a token is still valid.
    pub probe: String,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            vehicles: "Vehiculo".to_string(),
            profiles: "Usuario".to_string(),
            probe: "Vehiculo".to_string(),
        }
    }
}

/// Defaults applied by the create operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// City assigned to every new vehicle.
    pub vehicle_city: String,

    /// Role of new profile records unless the caller overrides it.
    pub profile_role: String,

    /// Status of new profile records.
    pub profile_status: String,

    /// Role assigned to every new platform account.
    pub account_role: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            vehicle_city: "1".to_string(),
            profile_role: "3".to_string(),
            profile_status: "active".to_string(),
            account_role: "4bf867c2-ea16-4c47-a042-efe0b39ecce9".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON lines instead of human-readable logs.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
