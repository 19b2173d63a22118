// ============================================
// File: crates/bluepair-core/src/error.rs
// ============================================
//! # Core Error Types
//!
//! ## Creation Reason
//! Defines error types specific to cryptographic and message-codec
//! operations in the bluepair core crate.
//!
//! ## Main Functionality
//! - `CoreError`: Primary error enum for core operations
//! - `Result<T>`: Type alias using `CoreError`
//!
//! ## Error Categories
//! 1. **Crypto Errors**: Key size, derivation, encryption failures
//! 2. **Message Errors**: Truncated or malformed handshake messages
//!
//! ## ⚠️ Important Note for Next Developer
//! - NEVER include key material in error messages
//! - Keep error messages informative but secure
//! - Retry decisions upstream depend only on the variant, so keep the
//!   taxonomy stable
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

use bluepair_common::error::CommonError;

// ============================================
// Result Type Alias
// ============================================

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

// ============================================
// CoreError
// ============================================

/// Core error types for cryptographic and codec operations.
///
/// # Security Note
/// Error messages are designed to be informative for debugging
/// without revealing sensitive information like key material.
#[derive(Error, Debug)]
pub enum CoreError {
    // ========================================
    // Cryptographic Errors
    // ========================================

    /// A key had the wrong length for the requested operation.
    #[error("Invalid key size: expected {expected} bytes, got {actual}")]
    InvalidKeySize {
        /// Required key length in bytes
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },

    /// Key derivation failed.
    #[error("Key derivation failed: {reason}")]
    KeyDerivation {
        /// Why derivation failed
        reason: String,
    },

    /// Encryption operation failed.
    #[error("Encryption failed: {context}")]
    Encryption {
        /// What was being encrypted
        context: String,
    },

    /// Decryption produced no usable plaintext (wrong key or tampering).
    #[error("Decryption failed")]
    Decryption,

    // ========================================
    // Message Errors
    // ========================================

    /// Unknown or unsupported message type byte.
    #[error("Unknown message type: 0x{0:02x}")]
    UnknownMessageType(u8),

    /// Message is too short to be valid.
    #[error("Truncated message: expected at least {expected} bytes, got {actual}")]
    TruncatedMessage {
        /// Minimum expected length
        expected: usize,
        /// Actual length received
        actual: usize,
    },

    /// Message content violates the fixed layout.
    #[error("Malformed message: {reason}")]
    MalformedMessage {
        /// What's wrong with the message
        reason: String,
    },

    // ========================================
    // Wrapped Errors
    // ========================================

    /// Error from common crate.
    #[error(transparent)]
    Common(#[from] CommonError),
}

impl CoreError {
    // ========================================
    // Convenience Constructors
    // ========================================

    /// Creates an `InvalidKeySize` error.
    pub const fn invalid_key_size(expected: usize, actual: usize) -> Self {
        Self::InvalidKeySize { expected, actual }
    }

    /// Creates a `KeyDerivation` error.
    pub fn key_derivation(reason: impl Into<String>) -> Self {
        Self::KeyDerivation {
            reason: reason.into(),
        }
    }

    /// Creates an `Encryption` error.
    pub fn encryption(context: impl Into<String>) -> Self {
        Self::Encryption {
            context: context.into(),
        }
    }

    /// Creates a `TruncatedMessage` error.
    pub const fn truncated(expected: usize, actual: usize) -> Self {
        Self::TruncatedMessage { expected, actual }
    }

    /// Creates a `MalformedMessage` error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedMessage {
            reason: reason.into(),
        }
    }

    /// Creates an invalid-input error (lifted from the common taxonomy).
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Common(CommonError::invalid_input(field, reason))
    }

    // ========================================
    // Error Classification
    // ========================================

    /// Returns `true` if this is a cryptographic error.
    ///
    /// Crypto errors indicate a contract violation or wrong secret, never
    /// a transient radio condition, so they are not retried upstream.
    #[must_use]
    pub const fn is_crypto_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidKeySize { .. }
                | Self::KeyDerivation { .. }
                | Self::Encryption { .. }
                | Self::Decryption
        )
    }

    /// Returns `true` if this is a message-format error.
    #[must_use]
    pub const fn is_message_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownMessageType(_) | Self::TruncatedMessage { .. } | Self::MalformedMessage { .. }
        )
    }

    /// Returns `true` if this error might indicate tampering.
    ///
    /// These errors warrant additional logging/monitoring.
    #[must_use]
    pub const fn is_suspicious(&self) -> bool {
        matches!(self, Self::Decryption)
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_key_size(16, 5);
        assert!(err.to_string().contains("16"));
        assert!(err.to_string().contains("5"));

        let err = CoreError::truncated(16, 10);
        assert!(err.to_string().contains("16"));
        assert!(err.to_string().contains("10"));
    }

    #[test]
    fn test_error_classification() {
        assert!(CoreError::invalid_key_size(16, 5).is_crypto_error());
        assert!(!CoreError::invalid_key_size(16, 5).is_message_error());

        assert!(CoreError::UnknownMessageType(0xFF).is_message_error());
        assert!(CoreError::truncated(16, 2).is_message_error());

        assert!(CoreError::Decryption.is_crypto_error());
        assert!(CoreError::Decryption.is_suspicious());
    }

    #[test]
    fn test_common_error_conversion() {
        let common = CommonError::invalid_input("field", "bad value");
        let core: CoreError = common.into();
        assert!(matches!(core, CoreError::Common(_)));

        let direct = CoreError::invalid_input("salt", "cannot be empty");
        assert!(matches!(direct, CoreError::Common(CommonError::InvalidInput { .. })));
    }
}
