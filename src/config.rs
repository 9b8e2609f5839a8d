// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Configuration for the Kafka test resource.
//!
//! Configuration is constructed programmatically or deserialized from JSON.
//! Nothing is read from the environment.
//!
//! # Quick Start
//!
//! ```rust
//! use broker_test_resource::config::KafkaResourceConfig;
//!
//! let config = KafkaResourceConfig {
//!     image_tag: Some("7.6.1".into()),
//!     ..Default::default()
//! };
//! assert_eq!(config.config_key, "camel.component.kafka.brokers");
//! ```
//!
//! # JSON Example
//!
//! ```json
//! {
//!   "config_key": "camel.component.kafka.brokers",
//!   "image_tag": "7.6.1",
//!   "startup_timeout_secs": 120
//! }
//! ```

use crate::error::{ResourceError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration key under which the bootstrap address is published.
pub const KAFKA_BROKERS_KEY: &str = "camel.component.kafka.brokers";

/// Settings for the Kafka container resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KafkaResourceConfig {
    /// Key of the single entry in the mapping returned by `start()`.
    #[serde(default = "default_config_key")]
    pub config_key: String,

    /// Image tag override. `None` keeps the image module's default tag.
    #[serde(default)]
    pub image_tag: Option<String>,

    /// Upper bound on how long the container may take to become ready.
    #[serde(default = "default_startup_timeout_secs")]
    pub startup_timeout_secs: u64,
}

fn default_config_key() -> String {
    KAFKA_BROKERS_KEY.to_string()
}

fn default_startup_timeout_secs() -> u64 {
    120
}

impl Default for KafkaResourceConfig {
    fn default() -> Self {
        Self {
            config_key: default_config_key(),
            image_tag: None,
            startup_timeout_secs: default_startup_timeout_secs(),
        }
    }
}

impl KafkaResourceConfig {
    /// Create a config with a short startup bound, for tests.
    pub fn for_testing() -> Self {
        Self {
            startup_timeout_secs: 60,
            ..Self::default()
        }
    }

    /// Startup bound as a `Duration`.
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs)
    }

    /// Parse a config from JSON, applying defaults for missing fields.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ResourceError::Config(format!("invalid resource config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that can never produce a usable resource.
    pub fn validate(&self) -> Result<()> {
        if self.config_key.trim().is_empty() {
            return Err(ResourceError::Config("config_key must not be empty".into()));
        }
        if self.startup_timeout_secs == 0 {
            return Err(ResourceError::Config(
                "startup_timeout_secs must be greater than zero".into(),
            ));
        }
        if let Some(tag) = &self.image_tag {
            if tag.trim().is_empty() {
                return Err(ResourceError::Config("image_tag must not be blank".into()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = KafkaResourceConfig::default();
        assert_eq!(config.config_key, "camel.component.kafka.brokers");
        assert!(config.image_tag.is_none());
        assert_eq!(config.startup_timeout(), Duration::from_secs(120));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_for_testing_config() {
        let config = KafkaResourceConfig::for_testing();
        assert_eq!(config.startup_timeout_secs, 60);
        assert_eq!(config.config_key, KAFKA_BROKERS_KEY);
    }

    #[test]
    fn test_from_json_applies_defaults() {
        let config = KafkaResourceConfig::from_json(r#"{"image_tag": "7.6.1"}"#).unwrap();
        assert_eq!(config.image_tag.as_deref(), Some("7.6.1"));
        assert_eq!(config.config_key, KAFKA_BROKERS_KEY);
        assert_eq!(config.startup_timeout_secs, 120);
    }

    #[test]
    fn test_from_json_empty_object() {
        let config = KafkaResourceConfig::from_json("{}").unwrap();
        assert_eq!(config, KafkaResourceConfig::default());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = KafkaResourceConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, ResourceError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = KafkaResourceConfig {
            startup_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        let err = KafkaResourceConfig::from_json(r#"{"config_key": "  "}"#).unwrap_err();
        assert!(err.to_string().contains("config_key"));
    }

    #[test]
    fn test_validate_rejects_blank_tag() {
        let config = KafkaResourceConfig {
            image_tag: Some(String::new()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = KafkaResourceConfig {
            config_key: "quarkus.kafka.bootstrap-servers".to_string(),
            image_tag: Some("7.5.0".to_string()),
            startup_timeout_secs: 45,
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed = KafkaResourceConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
