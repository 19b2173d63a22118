// ============================================
// File: crates/bluepair-core/src/crypto/block.rs
// ============================================
//! # Single-Block Cipher
//!
//! ## Creation Reason
//! The handshake exchanges exactly one cipher block in each direction: the
//! encoded 16-byte request going out, the 16-byte response coming back.
//! Both are wrapped with a raw AES-128 block operation, no mode, no
//! padding.
//!
//! ## Main Functionality
//! - `encrypt_block`: one AES-128 block under the shared secret
//! - `decrypt_block`: the inverse
//!
//! ## ⚠️ Important Note for Next Developer
//! - Input lengths are strict: 16-byte key, 16-byte block, nothing else
//! - A raw block operation is only safe because every message is exactly
//!   one block and never repeats across sessions; do not reuse this for
//!   longer or repeating plaintexts
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes128;

use super::{AUTHENTICITY_KEY_SIZE, BLOCK_SIZE};
use crate::error::{CoreError, Result};
use bluepair_common::error::CommonError;

/// Encrypts exactly one 16-byte block under the 16-byte shared secret.
///
/// # Errors
/// - `InvalidKeySize` if `shared_secret` is not 16 bytes
/// - `InvalidLength` (via the common taxonomy) if `block` is not 16 bytes
/// - `Encryption` if the cipher cannot be initialized
pub fn encrypt_block(shared_secret: &[u8], block: &[u8]) -> Result<[u8; BLOCK_SIZE]> {
    let (cipher, mut buf) = prepare(shared_secret, block)?;
    cipher.encrypt_block((&mut buf).into());
    Ok(buf)
}

/// Decrypts exactly one 16-byte block; the inverse of [`encrypt_block`].
///
/// # Errors
/// Same contract as [`encrypt_block`].
pub fn decrypt_block(shared_secret: &[u8], block: &[u8]) -> Result<[u8; BLOCK_SIZE]> {
    let (cipher, mut buf) = prepare(shared_secret, block)?;
    cipher.decrypt_block((&mut buf).into());
    Ok(buf)
}

fn prepare(shared_secret: &[u8], block: &[u8]) -> Result<(Aes128, [u8; BLOCK_SIZE])> {
    if shared_secret.len() != AUTHENTICITY_KEY_SIZE {
        return Err(CoreError::invalid_key_size(
            AUTHENTICITY_KEY_SIZE,
            shared_secret.len(),
        ));
    }
    if block.len() != BLOCK_SIZE {
        return Err(CommonError::invalid_length(BLOCK_SIZE, block.len()).into());
    }

    let cipher = Aes128::new_from_slice(shared_secret)
        .map_err(|_| CoreError::encryption("block cipher initialization"))?;

    let mut buf = [0u8; BLOCK_SIZE];
    buf.copy_from_slice(block);
    Ok((cipher, buf))
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // FIPS-197 Appendix C.1
    const KEY: [u8; 16] = hex!("000102030405060708090a0b0c0d0e0f");
    const PLAINTEXT: [u8; 16] = hex!("00112233445566778899aabbccddeeff");
    const CIPHERTEXT: [u8; 16] = hex!("69c4e0d86a7b0430d8cdb78070b4c55a");

    #[test]
    fn test_encrypt_known_vector() {
        let out = encrypt_block(&KEY, &PLAINTEXT).unwrap();
        assert_eq!(out, CIPHERTEXT);
    }

    #[test]
    fn test_decrypt_known_vector() {
        let out = decrypt_block(&KEY, &CIPHERTEXT).unwrap();
        assert_eq!(out, PLAINTEXT);
    }

    #[test]
    fn test_roundtrip() {
        let secret = [0x42u8; 16];
        let message = [0x5Au8; 16];

        let encrypted = encrypt_block(&secret, &message).unwrap();
        assert_ne!(encrypted, message);

        let decrypted = decrypt_block(&secret, &encrypted).unwrap();
        assert_eq!(decrypted, message);
    }

    #[test]
    fn test_rejects_wrong_key_size() {
        let err = encrypt_block(&[1, 2, 3, 4, 5], &PLAINTEXT).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidKeySize { expected: 16, actual: 5 }
        ));

        let err = decrypt_block(&[0u8; 32], &CIPHERTEXT).unwrap_err();
        assert!(matches!(err, CoreError::InvalidKeySize { .. }));
    }

    #[test]
    fn test_rejects_wrong_block_size() {
        let err = encrypt_block(&KEY, &[0u8; 15]).unwrap_err();
        assert!(matches!(err, CoreError::Common(_)));

        let err = decrypt_block(&KEY, &[0u8; 17]).unwrap_err();
        assert!(matches!(err, CoreError::Common(_)));
    }

    #[test]
    fn test_different_keys_differ() {
        let message = [0x5Au8; 16];
        let c1 = encrypt_block(&[0x01u8; 16], &message).unwrap();
        let c2 = encrypt_block(&[0x02u8; 16], &message).unwrap();
        assert_ne!(c1, c2);
    }
}
