// ============================================
// File: crates/bluepair-seeker/src/error.rs
// ============================================
//! # Seeker Error Types
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

use bluepair_common::error::CommonError;
use bluepair_common::BluetoothAddress;
use bluepair_core::error::CoreError;
use bluepair_gatt::error::GattError;

/// Result type for seeker operations.
pub type Result<T> = std::result::Result<T, SeekerError>;

/// Seeker error types.
#[derive(Error, Debug)]
pub enum SeekerError {
    /// Reading or parsing a configuration file failed.
    #[error("Failed to load configuration from '{path}': {reason}")]
    ConfigLoad {
        /// Path that was being loaded
        path: String,
        /// What went wrong
        reason: String,
    },

    /// A configuration value failed validation.
    #[error("Invalid configuration: {field} - {reason}")]
    ConfigInvalid {
        /// Offending field
        field: String,
        /// Why it was rejected
        reason: String,
    },

    /// The handshake ended without a response.
    #[error("Handshake failed after {attempts} attempt(s)")]
    Handshake {
        /// Attempts made before giving up
        attempts: u32,
        /// Last GATT failure seen
        #[source]
        source: GattError,
    },

    /// The provider stopped advertising mid-handshake.
    #[error("Provider signal lost during handshake")]
    SignalLost {
        /// GATT failure that triggered the signal check
        #[source]
        source: GattError,
    },

    /// The provider moved to a new address mid-handshake.
    #[error("Provider rotated to address {new_address} during handshake")]
    SignalRotated {
        /// Address the provider advertises under now
        new_address: BluetoothAddress,
        /// GATT failure that triggered the signal check
        #[source]
        source: GattError,
    },

    /// A second handshake was started while one was running.
    #[error("A handshake is already in flight for {address}")]
    ConcurrentHandshake {
        /// Peer the running handshake targets
        address: BluetoothAddress,
    },

    /// Error from common crate.
    #[error(transparent)]
    Common(#[from] CommonError),

    /// Crypto or codec error from the core crate.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// GATT error outside an attempt's classification.
    #[error(transparent)]
    Gatt(#[from] GattError),

    /// System I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SeekerError {
    /// Creates a configuration load error.
    pub fn config_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a configuration validation error.
    pub fn config_invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an exhausted-handshake error.
    pub const fn handshake(attempts: u32, source: GattError) -> Self {
        Self::Handshake { attempts, source }
    }

    /// Creates a signal-lost error.
    pub const fn signal_lost(source: GattError) -> Self {
        Self::SignalLost { source }
    }

    /// Creates a signal-rotated error.
    pub const fn signal_rotated(new_address: BluetoothAddress, source: GattError) -> Self {
        Self::SignalRotated {
            new_address,
            source,
        }
    }

    /// Returns true if this error came from configuration handling.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigLoad { .. } | Self::ConfigInvalid { .. }
        )
    }

    /// Terminal handshake outcomes that callers answer with a
    /// fallback pairing path.
    #[must_use]
    pub const fn is_terminal_handshake(&self) -> bool {
        matches!(
            self,
            Self::Handshake { .. } | Self::SignalLost { .. } | Self::SignalRotated { .. }
        )
    }

    /// New provider address to re-target, when one is known.
    #[must_use]
    pub const fn rotated_address(&self) -> Option<BluetoothAddress> {
        match self {
            Self::SignalRotated { new_address, .. } => Some(*new_address),
            _ => None,
        }
    }

    /// The GATT failure behind a terminal handshake outcome.
    #[must_use]
    pub const fn gatt_cause(&self) -> Option<&GattError> {
        match self {
            Self::Handshake { source, .. }
            | Self::SignalLost { source }
            | Self::SignalRotated { source, .. } => Some(source),
            Self::Gatt(source) => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SeekerError::config_load("/etc/bluepair/seeker.toml", "file not found");
        assert!(err.to_string().contains("/etc/bluepair/seeker.toml"));

        let err = SeekerError::handshake(4, GattError::status("write", 133));
        assert!(err.to_string().contains("4 attempt"));
    }

    #[test]
    fn test_error_classification() {
        let config_err = SeekerError::config_invalid("max_retries", "too large");
        assert!(config_err.is_config_error());
        assert!(!config_err.is_terminal_handshake());

        let terminal = SeekerError::signal_lost(GattError::timeout("wait", 3000));
        assert!(terminal.is_terminal_handshake());
        assert!(terminal.rotated_address().is_none());
    }

    #[test]
    fn test_rotated_address_carried() {
        let rotated = BluetoothAddress::new([0xCC; 6]);
        let err = SeekerError::signal_rotated(rotated, GattError::status("write", 133));
        assert_eq!(err.rotated_address(), Some(rotated));
    }

    #[test]
    fn test_causal_error_preserved() {
        let err = SeekerError::handshake(1, GattError::status("write", 257));
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.to_string().contains("257"));
        assert_eq!(err.gatt_cause().and_then(GattError::status_code), Some(257));
    }
}
