// ============================================
// File: crates/bluepair-seeker/src/config.rs
// ============================================
//! # Seeker Configuration
//!
//! ## Creation Reason
//! Provides configuration management for the seeker binary,
//! supporting TOML files with per-field defaults.
//!
//! ## Main Functionality
//! - `SeekerConfig`: Main configuration structure
//! - TOML file loading and parsing
//! - Configuration validation
//! - Projection into a [`RetryPolicy`]
//!
//! ## Configuration Sections
//! - `provider`: address, authenticity key, model id
//! - `handshake`: retry budget and timeout tuning
//! - `sightings`: advertisement freshness tracking
//! - `logging`: log level
//!
//! ## Example Configuration
//! ```toml
//! [provider]
//! address = "BB:BB:BB:BB:BB:1E"
//! authenticity_key = "101112131415161718191A1B1C1D1E1F"
//! model_id = 1193046
//!
//! [handshake]
//! max_retries = 3
//! retry_on_timeout = true
//! no_retry_status_codes = [257]
//! short_timeout_ms = 3000
//! long_timeout_ms = 10000
//! short_retry_max_spent_time_ms = 5000
//! base_operation_timeout_ms = 3000
//!
//! [sightings]
//! track_provider = true
//! freshness_window_secs = 10
//!
//! [logging]
//! level = "info"
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Addresses and keys stay strings in the file; parse accessors
//!   return the typed forms and `validate` runs the same parses
//! - Timeout fields are milliseconds, the freshness window seconds
//!
//! ## Last Modified
//! v0.1.0 - Initial configuration implementation

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use bluepair_common::{AuthenticityKey, BluetoothAddress, ModelId};

use crate::error::{Result, SeekerError};
use crate::policy::RetryPolicy;

// ============================================
// SeekerConfig
// ============================================

/// Main seeker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeekerConfig {
    /// Provider identity.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Handshake retry and timeout tuning.
    #[serde(default)]
    pub handshake: HandshakeConfig,

    /// Advertisement freshness tracking.
    #[serde(default)]
    pub sightings: SightingsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SeekerConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns error if file cannot be read, parsed, or validated.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        info!("Loading configuration from: {}", path_str);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SeekerError::config_load(&path_str, e.to_string()))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| SeekerError::config_load(&path_str, e.to_string()))?;

        config.validate()?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Loads configuration from a string (useful for testing).
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| SeekerError::config_load("<string>", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.provider.validate()?;
        self.handshake.validate()?;
        self.sightings.validate()?;
        Ok(())
    }

    /// Serializes configuration to TOML string.
    #[must_use]
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

impl Default for SeekerConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            handshake: HandshakeConfig::default(),
            sightings: SightingsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ============================================
// ProviderConfig
// ============================================

/// Provider identity section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider address in `AA:BB:CC:DD:EE:FF` form.
    #[serde(default = "default_address")]
    pub address: String,

    /// Shared authenticity key, 32 hex characters.
    #[serde(default = "default_authenticity_key")]
    pub authenticity_key: String,

    /// Advertised model id, at most 24 bits.
    #[serde(default = "default_model_id")]
    pub model_id: u32,
}

fn default_address() -> String {
    "BB:BB:BB:BB:BB:1E".to_string()
}

fn default_authenticity_key() -> String {
    "101112131415161718191A1B1C1D1E1F".to_string()
}

fn default_model_id() -> u32 {
    0x0012_3456
}

impl ProviderConfig {
    fn validate(&self) -> Result<()> {
        self.parse_address()?;
        self.parse_key()?;
        self.parse_model_id()?;
        Ok(())
    }

    /// Parses the provider address.
    pub fn parse_address(&self) -> Result<BluetoothAddress> {
        self.address
            .parse()
            .map_err(|_| SeekerError::config_invalid("provider.address", "not a valid address"))
    }

    /// Parses the authenticity key.
    pub fn parse_key(&self) -> Result<AuthenticityKey> {
        self.authenticity_key.parse().map_err(|_| {
            SeekerError::config_invalid("provider.authenticity_key", "not 32 hex characters")
        })
    }

    /// Parses the model id.
    pub fn parse_model_id(&self) -> Result<ModelId> {
        ModelId::from_u32(self.model_id)
            .ok_or_else(|| SeekerError::config_invalid("provider.model_id", "exceeds 24 bits"))
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            authenticity_key: default_authenticity_key(),
            model_id: default_model_id(),
        }
    }
}

// ============================================
// HandshakeConfig
// ============================================

/// Handshake retry and timeout section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakeConfig {
    /// Retries allowed after the first attempt. Zero disables
    /// retrying entirely.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Whether a timed-out attempt may be retried.
    #[serde(default = "default_retry_on_timeout")]
    pub retry_on_timeout: bool,

    /// GATT status codes that end the handshake immediately.
    #[serde(default)]
    pub no_retry_status_codes: Vec<i32>,

    /// Per-attempt timeout while the session is young.
    #[serde(default = "default_short_timeout_ms")]
    pub short_timeout_ms: u64,

    /// Per-attempt timeout once the session has dragged on.
    #[serde(default = "default_long_timeout_ms")]
    pub long_timeout_ms: u64,

    /// Session age at which attempts switch to the long timeout.
    #[serde(default = "default_short_retry_max_spent_time_ms")]
    pub short_retry_max_spent_time_ms: u64,

    /// Timeout used when retries are disabled.
    #[serde(default = "default_base_operation_timeout_ms")]
    pub base_operation_timeout_ms: u64,
}

fn default_max_retries() -> u32 {
    crate::policy::DEFAULT_MAX_RETRIES
}

fn default_retry_on_timeout() -> bool {
    true
}

fn default_short_timeout_ms() -> u64 {
    3000
}

fn default_long_timeout_ms() -> u64 {
    10_000
}

fn default_short_retry_max_spent_time_ms() -> u64 {
    5000
}

fn default_base_operation_timeout_ms() -> u64 {
    3000
}

impl HandshakeConfig {
    fn validate(&self) -> Result<()> {
        self.to_policy().validate()
    }

    /// Projects this section into a [`RetryPolicy`].
    #[must_use]
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy::new()
            .with_max_retries(self.max_retries)
            .with_retry_on_timeout(self.retry_on_timeout)
            .with_no_retry_status_codes(self.no_retry_status_codes.iter().copied())
            .with_timeouts(
                Duration::from_millis(self.short_timeout_ms),
                Duration::from_millis(self.long_timeout_ms),
            )
            .with_short_retry_max_spent_time(Duration::from_millis(
                self.short_retry_max_spent_time_ms,
            ))
            .with_base_operation_timeout(Duration::from_millis(self.base_operation_timeout_ms))
    }
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_on_timeout: default_retry_on_timeout(),
            no_retry_status_codes: Vec::new(),
            short_timeout_ms: default_short_timeout_ms(),
            long_timeout_ms: default_long_timeout_ms(),
            short_retry_max_spent_time_ms: default_short_retry_max_spent_time_ms(),
            base_operation_timeout_ms: default_base_operation_timeout_ms(),
        }
    }
}

// ============================================
// SightingsConfig
// ============================================

/// Advertisement tracking section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SightingsConfig {
    /// Whether retries consult the sighting log for signal loss.
    #[serde(default = "default_track_provider")]
    pub track_provider: bool,

    /// How long a sighting counts as fresh.
    #[serde(default = "default_freshness_window_secs")]
    pub freshness_window_secs: u64,
}

fn default_track_provider() -> bool {
    true
}

fn default_freshness_window_secs() -> u64 {
    10
}

impl SightingsConfig {
    fn validate(&self) -> Result<()> {
        if self.freshness_window_secs == 0 {
            return Err(SeekerError::config_invalid(
                "sightings.freshness_window_secs",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Returns the freshness window as a duration.
    #[must_use]
    pub fn freshness_window(&self) -> Duration {
        Duration::from_secs(self.freshness_window_secs)
    }
}

impl Default for SightingsConfig {
    fn default() -> Self {
        Self {
            track_provider: default_track_provider(),
            freshness_window_secs: default_freshness_window_secs(),
        }
    }
}

// ============================================
// LoggingConfig
// ============================================

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SeekerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.handshake.to_policy(), RetryPolicy::default());
    }

    #[test]
    fn test_full_config_format() {
        let toml = r#"
            [provider]
            address = "AA:BB:CC:DD:EE:FF"
            authenticity_key = "000102030405060708090A0B0C0D0E0F"
            model_id = 4660

            [handshake]
            max_retries = 1
            retry_on_timeout = false
            no_retry_status_codes = [257, 133]
            short_timeout_ms = 2000
            long_timeout_ms = 8000
            short_retry_max_spent_time_ms = 4000
            base_operation_timeout_ms = 2500

            [sightings]
            track_provider = false
            freshness_window_secs = 30

            [logging]
            level = "debug"
        "#;

        let config = SeekerConfig::from_str(toml).unwrap();
        assert_eq!(
            config.provider.parse_address().unwrap(),
            BluetoothAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF])
        );
        assert_eq!(config.provider.parse_model_id().unwrap().as_u32(), 4660);
        assert!(!config.sightings.track_provider);

        let policy = config.handshake.to_policy();
        assert_eq!(policy.max_retries, 1);
        assert!(!policy.retry_on_timeout);
        assert!(!policy.allows_status(257));
        assert!(!policy.allows_status(133));
        assert_eq!(
            policy.timeout_for(Duration::from_millis(0)),
            Duration::from_millis(2000)
        );
    }

    #[test]
    fn test_invalid_address_rejected() {
        let toml = r#"
            [provider]
            address = "not-an-address"
        "#;

        let error = SeekerConfig::from_str(toml).unwrap_err();
        assert!(error.is_config_error());
    }

    #[test]
    fn test_oversized_model_id_rejected() {
        let toml = r#"
            [provider]
            model_id = 16777216
        "#;

        assert!(SeekerConfig::from_str(toml).is_err());
    }

    #[test]
    fn test_inverted_timeouts_rejected() {
        let toml = r#"
            [handshake]
            short_timeout_ms = 10000
            long_timeout_ms = 3000
        "#;

        let error = SeekerConfig::from_str(toml).unwrap_err();
        assert!(error.is_config_error());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SeekerConfig::default();
        let rendered = config.to_toml();
        let reparsed = SeekerConfig::from_str(&rendered).unwrap();
        assert_eq!(reparsed.provider.address, config.provider.address);
        assert_eq!(reparsed.handshake.max_retries, config.handshake.max_retries);
    }
}
