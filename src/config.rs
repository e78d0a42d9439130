//! Controller configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a [`ControllerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max_pin_attempts must be at least 1")]
    ZeroPinAttempts,

    #[error("Deserialization failed: {0}")]
    DeserializationFailed(#[from] serde_json::Error),
}

/// Immutable settings for one controller instance.
///
/// # Example
///
/// ```rust
/// use atm_session::ControllerConfig;
///
/// let config = ControllerConfig::from_json(r#"{ "max_pin_attempts": 5 }"#).unwrap();
/// assert_eq!(config.max_pin_attempts(), 5);
///
/// let defaults = ControllerConfig::from_json("{}").unwrap();
/// assert_eq!(defaults.max_pin_attempts(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    max_pin_attempts: u32,
}

impl ControllerConfig {
    pub const DEFAULT_MAX_PIN_ATTEMPTS: u32 = 3;

    pub fn new(max_pin_attempts: u32) -> Result<Self, ConfigError> {
        Self { max_pin_attempts }.validated()
    }

    /// Parse a JSON document; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validated()
    }

    /// Failed PIN attempts allowed before the card is ejected.
    pub fn max_pin_attempts(&self) -> u32 {
        self.max_pin_attempts
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.max_pin_attempts == 0 {
            return Err(ConfigError::ZeroPinAttempts);
        }
        Ok(self)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_pin_attempts: Self::DEFAULT_MAX_PIN_ATTEMPTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allows_three_attempts() {
        assert_eq!(ControllerConfig::default().max_pin_attempts(), 3);
    }

    #[test]
    fn new_rejects_zero_attempts() {
        assert!(matches!(
            ControllerConfig::new(0),
            Err(ConfigError::ZeroPinAttempts)
        ));
        assert_eq!(ControllerConfig::new(1).unwrap().max_pin_attempts(), 1);
    }

    #[test]
    fn from_json_validates_parsed_values() {
        assert!(matches!(
            ControllerConfig::from_json(r#"{ "max_pin_attempts": 0 }"#),
            Err(ConfigError::ZeroPinAttempts)
        ));
    }

    #[test]
    fn from_json_reports_malformed_input() {
        let err = ControllerConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::DeserializationFailed(_)));
        assert!(err.to_string().contains("Deserialization failed"));
    }

    #[test]
    fn config_roundtrips_through_json() {
        let config = ControllerConfig::new(4).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(ControllerConfig::from_json(&json).unwrap(), config);
    }
}
