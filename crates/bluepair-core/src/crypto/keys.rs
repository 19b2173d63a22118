// ============================================
// File: crates/bluepair-core/src/crypto/keys.rs
// ============================================
//! # Public Key Material
//!
//! ## Creation Reason
//! An initial pairing request carries the seeker's raw public key
//! immediately after the encrypted block, so the provider can run its key
//! agreement before answering. Subsequent-pair requests omit it.
//!
//! ## Main Functionality
//! - `PublicKeyMaterial`: validated 64-byte public key blob
//!
//! ## ⚠️ Important Note for Next Developer
//! - The 64 bytes are the uncompressed curve point coordinates (x || y),
//!   produced and consumed by the out-of-band key agreement; this crate
//!   only carries them
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::PUBLIC_KEY_MATERIAL_SIZE;
use crate::error::{CoreError, Result};
use bluepair_common::error::CommonError;

/// The seeker's 64-byte public key blob, appended raw to the first
/// handshake write.
///
/// # Wire Format
/// ```text
/// ┌──────────────────────┬───────────────────────────────┐
/// │ encrypted block (16) │ public key material (64)      │
/// └──────────────────────┴───────────────────────────────┘
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKeyMaterial([u8; PUBLIC_KEY_MATERIAL_SIZE]);

impl PublicKeyMaterial {
    /// Creates public key material from a byte slice.
    ///
    /// # Returns
    /// - `Some(PublicKeyMaterial)` if the slice is exactly 64 bytes
    /// - `None` otherwise
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != PUBLIC_KEY_MATERIAL_SIZE {
            return None;
        }
        let mut material = [0u8; PUBLIC_KEY_MATERIAL_SIZE];
        material.copy_from_slice(bytes);
        Some(Self(material))
    }

    /// Parses base64-encoded public key material.
    ///
    /// # Errors
    /// - `InvalidInput` if the base64 is malformed
    /// - `InvalidLength` (via the common taxonomy) if it decodes to a
    ///   length other than 64
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| CoreError::invalid_input("public_key", e.to_string()))?;

        Self::from_bytes(&bytes).ok_or_else(|| {
            CommonError::invalid_length(PUBLIC_KEY_MATERIAL_SIZE, bytes.len()).into()
        })
    }

    /// Returns the raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; PUBLIC_KEY_MATERIAL_SIZE] {
        &self.0
    }
}

impl fmt::Debug for PublicKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PublicKeyMaterial({:02x}{:02x}{:02x}{:02x}...)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

impl AsRef<[u8]> for PublicKeyMaterial {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ============================================
// Tests
// ============================================
