// ============================================
// File: crates/bluepair-core/src/crypto/kdf.rs
// ============================================
//! # Key Derivation
//!
//! ## Creation Reason
//! Every sub-key in the handshake cryptography (encryption keys, effective
//! IVs, HMAC keys, tags) is derived from a master input and a fixed 16-byte
//! domain-separation constant. This module is the single implementation of
//! that derivation.
//!
//! ## Main Functionality
//! - `derive_key`: HKDF-SHA256 expansion with an empty info parameter
//!
//! ## ⚠️ Important Note for Next Developer
//! - Never log input or output key material, even at trace level
//! - The empty info parameter is part of the wire contract; peers derive
//!   the same sub-keys with the same (input, salt, length) triple
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

use hkdf::Hkdf;
use sha2::Sha256;

use crate::error::{CoreError, Result};

/// Maximum output HKDF-SHA256 can produce (255 blocks of 32 bytes).
const MAX_OUTPUT_LEN: usize = 255 * 32;

/// Derives `output_len` bytes from `secret` under the given `salt`.
///
/// Deterministic: the same `(secret, salt, output_len)` triple always
/// produces the same output. The HKDF info parameter is empty.
///
/// # Arguments
/// * `secret` - Input keying material (any non-zero length)
/// * `salt` - Domain-separation constant or per-message salt
/// * `output_len` - Desired output length in bytes (1 to 8160)
///
/// # Errors
/// - `InvalidInput` if `secret` is empty or `output_len` is zero
/// - `KeyDerivation` if `output_len` exceeds the HKDF-SHA256 bound
pub fn derive_key(secret: &[u8], salt: &[u8], output_len: usize) -> Result<Vec<u8>> {
    if secret.is_empty() {
        return Err(CoreError::invalid_input("secret", "cannot be empty"));
    }
    if output_len == 0 {
        return Err(CoreError::invalid_input(
            "output_len",
            "must be greater than zero",
        ));
    }

    let hk = Hkdf::<Sha256>::new(Some(salt), secret);

    let mut output = vec![0u8; output_len];
    hk.expand(&[], &mut output)
        .map_err(|_| CoreError::key_derivation(format!(
            "HKDF expansion failed for {} bytes (max {})",
            output_len, MAX_OUTPUT_LEN
        )))?;

    Ok(output)
}

// ============================================
// Tests
// ============================================
