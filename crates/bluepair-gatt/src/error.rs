// ============================================
// File: crates/bluepair-gatt/src/error.rs
// ============================================
//! # GATT Error Types
//!
//! ## Creation Reason
//! Defines error types for GATT characteristic I/O as seen by the
//! handshake layer: status-coded failures, timeouts, and connection
//! state problems.
//!
//! ## Main Functionality
//! - `GattError`: Primary error enum for GATT operations
//! - Well-known status code constants
//! - Classification helpers the retry policy consumes
//!
//! ## Error Categories
//! 1. **Status Errors**: The peer's stack reported a numeric status
//! 2. **Timeouts**: No response within the caller's deadline
//! 3. **Connection Errors**: Operations on a dead or missing link
//! 4. **System Errors**: I/O failures from the platform adapter
//!
//! ## ⚠️ Important Note for Next Developer
//! - Retry decisions live in the seeker's policy, not here; this
//!   module only exposes the facts (status code, timeout-ness)
//! - Status codes come from the remote stack and are not remapped
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use std::io;

use thiserror::Error;

use bluepair_common::error::CommonError;

use crate::traits::CharacteristicId;

// ============================================
// Result Type Alias
// ============================================

/// Result type for GATT operations.
pub type Result<T> = std::result::Result<T, GattError>;

// ============================================
// Well-Known Status Codes
// ============================================

/// Status reported when the link drops mid-operation (0x85).
pub const GATT_ERROR: i32 = 133;

/// Generic failure status reported by the remote stack (0x101).
pub const GATT_FAILURE: i32 = 257;

// ============================================
// GattError
// ============================================

/// GATT layer error types.
///
/// # Categories
/// - **Status**: Numeric status codes from the remote stack
/// - **Timeout**: Bounded waits that expired
/// - **Connection**: Dead links and missing characteristics
/// - **System**: Platform adapter failures
#[derive(Error, Debug)]
pub enum GattError {
    // ========================================
    // Status Errors
    // ========================================

    /// The remote stack rejected an operation with a status code.
    #[error("GATT {operation} failed with status {status}")]
    Status {
        /// Which operation failed
        operation: String,
        /// Status code reported by the stack
        status: i32,
    },

    // ========================================
    // Timeouts
    // ========================================

    /// An operation did not complete within its deadline.
    #[error("GATT {operation} timed out after {timeout_ms} ms")]
    OperationTimeout {
        /// Which operation timed out
        operation: String,
        /// Deadline that expired, in milliseconds
        timeout_ms: u64,
    },

    // ========================================
    // Connection Errors
    // ========================================

    /// The connection is closed or was never established.
    #[error("Not connected to peer")]
    NotConnected,

    /// The requested characteristic is absent from the peer's table.
    #[error("Characteristic {characteristic} not found")]
    CharacteristicNotFound {
        /// Which characteristic was missing
        characteristic: CharacteristicId,
    },

    /// The notification stream ended while a wait was outstanding.
    #[error("Notification stream closed")]
    NotificationsClosed,

    // ========================================
    // Wrapped Errors
    // ========================================

    /// I/O error from the platform adapter.
    #[error("I/O error: {context}")]
    Io {
        /// What was happening when the error occurred
        context: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error from common crate.
    #[error(transparent)]
    Common(#[from] CommonError),
}

impl GattError {
    // ========================================
    // Convenience Constructors
    // ========================================

    /// Creates a `Status` error.
    pub fn status(operation: impl Into<String>, status: i32) -> Self {
        Self::Status {
            operation: operation.into(),
            status,
        }
    }

    /// Creates an `OperationTimeout` error.
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::OperationTimeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Creates an `Io` error with context.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    // ========================================
    // Error Classification
    // ========================================

    /// Returns the numeric status code, if the remote stack gave one.
    #[must_use]
    pub const fn status_code(&self) -> Option<i32> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this failure was a timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::OperationTimeout { .. })
    }

    /// Returns `true` if the connection itself is unusable.
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::NotConnected | Self::CharacteristicNotFound { .. } | Self::NotificationsClosed
        )
    }
}

// ============================================
// Error Conversions
// ============================================

impl From<io::Error> for GattError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            context: "unspecified I/O operation".into(),
            source: err,
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
    fn test_error_display() {
        let err = GattError::status("write", GATT_ERROR);
        assert!(err.to_string().contains("write"));
        assert!(err.to_string().contains("133"));

        let err = GattError::timeout("notification wait", 3000);
        assert!(err.to_string().contains("3000"));
    }

    #[test]
    fn test_status_code_extraction() {
        assert_eq!(GattError::status("write", GATT_FAILURE).status_code(), Some(257));
        assert_eq!(GattError::NotConnected.status_code(), None);
        assert_eq!(GattError::timeout("wait", 100).status_code(), None);
    }

    #[test]
    fn test_error_classification() {
        assert!(GattError::timeout("wait", 100).is_timeout());
        assert!(!GattError::status("write", 133).is_timeout());

        assert!(GattError::NotConnected.is_connection_error());
        assert!(GattError::NotificationsClosed.is_connection_error());
        assert!(!GattError::status("write", 133).is_connection_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::TimedOut, "timed out");
        let gatt_err: GattError = io_err.into();
        assert!(matches!(gatt_err, GattError::Io { .. }));
    }
}
