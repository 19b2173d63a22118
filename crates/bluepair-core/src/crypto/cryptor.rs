// ============================================
// File: crates/bluepair-core/src/crypto/cryptor.rs
// ============================================
//! # Broadcast Cryptors
//!
//! ## Creation Reason
//! Advertisement payloads and identity frames are protected by a stream
//! cipher plus an HMAC tag, both keyed through HKDF from the shared
//! authenticity key. Two wire-incompatible protocol variants exist and both
//! must stay available; a pass-through variant supports test harnesses.
//!
//! ## Main Functionality
//! - [`Cryptor`]: the common encrypt/decrypt/sign/verify contract
//! - [`CryptorV1`]: 16-byte tags, V1 domain constants
//! - [`IdentityV1Cryptor`]: 8-byte tags, its own domain constants, and a
//!   salt-keyed signing contract (the second `sign` argument is the HKDF
//!   salt, not an authenticity key)
//! - [`FakeCryptor`]: no transformation, fixed tag
//!
//! ## Algorithm
//! ```text
//! encryption key = derive_key(authenticity key, KEY_SALT,  32)
//! effective IV   = derive_key(message salt,     IV_SALT,   16)
//! ciphertext     = AES-256-CTR(encryption key, effective IV, plaintext)
//!
//! V1 tag         = derive_key(data, derive_key(key, HMAC_KEY_SALT, 16), 16)
//! IdentityV1 tag = derive_key(data, salt, 8)
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - The six domain constants are wire-protocol values shared with peers;
//!   never edit them and never reuse one across variants
//! - The golden vectors in the tests pin interoperability with deployed
//!   peers; if one fails, the implementation is wrong, not the vector
//! - Verification is constant-time over the full tag length
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use ctr::Ctr128BE;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use super::kdf::derive_key;
use super::{
    AES_CTR_IV_SIZE, AUTHENTICITY_KEY_SIZE, ENCRYPTION_KEY_SIZE, IDENTITY_V1_HMAC_TAG_SIZE,
    V1_HMAC_TAG_SIZE,
};
use crate::error::{CoreError, Result};

/// AES-256 in counter mode with a big-endian 128-bit counter.
type Aes256Ctr = Ctr128BE<Aes256>;

// ============================================
// Domain Constants
// ============================================
// Fixed 16-byte HKDF salts, one per derived-key purpose. The V1 encryption
// and HMAC constants carry identical bytes; they are still separate knobs
// of the protocol definition and are kept as distinct constants.

/// V1: derives the AES-256 encryption key from the authenticity key.
const V1_ENCRYPTION_KEY_SALT: [u8; 16] = [
    0x0C, 0xC5, 0x13, 0x17, 0x60, 0x39, 0xC5, 0x13, 0x75, 0xE1, 0x8C, 0xC3, 0x56, 0xE7, 0xDF,
    0xB2,
];

/// V1: derives the effective CTR IV from the per-message salt.
const V1_IV_SALT: [u8; 16] = [
    0x6F, 0x30, 0xAD, 0xB1, 0xF6, 0x9A, 0xF0, 0x49, 0x2B, 0x37, 0x66, 0x81, 0x3A, 0xED, 0x8F,
    0x04,
];

/// V1: derives the HMAC key from the authenticity key.
const V1_HMAC_KEY_SALT: [u8; 16] = [
    0x0C, 0xC5, 0x13, 0x17, 0x60, 0x39, 0xC5, 0x13, 0x75, 0xE1, 0x8C, 0xC3, 0x56, 0xE7, 0xDF,
    0xB2,
];

/// IdentityV1: derives the AES-256 encryption key from the authenticity key.
const IDENTITY_ENCRYPTION_KEY_SALT: [u8; 16] = [
    0x0E, 0x85, 0xD9, 0x2A, 0x6D, 0x7F, 0x53, 0x1B, 0x1B, 0x0B, 0x5B, 0xDA, 0x5C, 0x11, 0xAC,
    0x42,
];

/// IdentityV1: derives the effective CTR IV from the per-message salt.
const IDENTITY_IV_SALT: [u8; 16] = [
    0x2E, 0x53, 0xED, 0x0A, 0x81, 0xE1, 0xE1, 0x0C, 0x1F, 0x4C, 0x3F, 0xF7, 0x21, 0xBE, 0x0F,
    0xF6,
];

/// IdentityV1: default signing salt when the caller supplies none.
const IDENTITY_TAG_SALT: [u8; 16] = [
    0xEA, 0xAD, 0xFA, 0x43, 0x10, 0x9D, 0xF3, 0xF7, 0x08, 0xFD, 0xF0, 0x25, 0xB5, 0x2F, 0x01,
    0xC8,
];

// ============================================
// Cryptor Trait
// ============================================

/// Symmetric protection for broadcast payloads.
///
/// One variant is selected per session and fixed for its duration. The
/// variants are wire-incompatible: their domain constants are disjoint and
/// their tag lengths differ.
pub trait Cryptor {
    /// Encrypts `plaintext` under the authenticity key and per-message salt.
    ///
    /// # Errors
    /// - `InvalidKeySize` if `authenticity_key` is not 16 bytes
    /// - `Encryption` if the underlying cipher cannot be initialized
    fn encrypt(&self, plaintext: &[u8], salt: &[u8], authenticity_key: &[u8]) -> Result<Vec<u8>>;

    /// Decrypts `ciphertext`; the exact inverse of [`Cryptor::encrypt`].
    ///
    /// # Errors
    /// Same contract as [`Cryptor::encrypt`].
    fn decrypt(&self, ciphertext: &[u8], salt: &[u8], authenticity_key: &[u8])
        -> Result<Vec<u8>>;

    /// Produces the variant's fixed-length authentication tag for `data`.
    ///
    /// For [`CryptorV1`] the `key` argument is the 16-byte authenticity
    /// key. For [`IdentityV1Cryptor`] it is used directly as the HKDF salt.
    fn sign(&self, data: &[u8], key: &[u8]) -> Result<Vec<u8>>;

    /// Recomputes the tag for `data` and compares it to `tag`.
    ///
    /// Comparison covers the full tag length in constant time. Any signing
    /// failure verifies as `false`.
    fn verify(&self, data: &[u8], key: &[u8], tag: &[u8]) -> bool {
        match self.sign(data, key) {
            Ok(expected) => expected.ct_eq(tag).into(),
            Err(_) => false,
        }
    }

    /// Length in bytes of the tags this variant produces.
    fn tag_len(&self) -> usize;
}

// ============================================
// Shared CTR Transform
// ============================================

/// Runs the CTR keystream over `data` with variant-specific constants.
///
/// CTR mode is self-inverse, so encrypt and decrypt share this path.
fn ctr_transform(
    data: &[u8],
    salt: &[u8],
    authenticity_key: &[u8],
    key_salt: &[u8; 16],
    iv_salt: &[u8; 16],
) -> Result<Vec<u8>> {
    if authenticity_key.len() != AUTHENTICITY_KEY_SIZE {
        return Err(CoreError::invalid_key_size(
            AUTHENTICITY_KEY_SIZE,
            authenticity_key.len(),
        ));
    }

    let mut encryption_key = derive_key(authenticity_key, key_salt, ENCRYPTION_KEY_SIZE)?;
    let effective_iv = derive_key(salt, iv_salt, AES_CTR_IV_SIZE)?;

    let mut cipher = Aes256Ctr::new_from_slices(&encryption_key, &effective_iv)
        .map_err(|_| CoreError::encryption("CTR cipher initialization"))?;

    let mut output = data.to_vec();
    cipher.apply_keystream(&mut output);

    encryption_key.zeroize();
    Ok(output)
}

// ============================================
// CryptorV1
// ============================================

/// The V1 protocol variant: 16-byte HMAC tags.
#[derive(Debug, Default, Clone, Copy)]
pub struct CryptorV1;

impl CryptorV1 {
    /// Creates a V1 cryptor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Cryptor for CryptorV1 {
    fn encrypt(&self, plaintext: &[u8], salt: &[u8], authenticity_key: &[u8]) -> Result<Vec<u8>> {
        ctr_transform(
            plaintext,
            salt,
            authenticity_key,
            &V1_ENCRYPTION_KEY_SALT,
            &V1_IV_SALT,
        )
    }

    fn decrypt(
        &self,
        ciphertext: &[u8],
        salt: &[u8],
        authenticity_key: &[u8],
    ) -> Result<Vec<u8>> {
        ctr_transform(
            ciphertext,
            salt,
            authenticity_key,
            &V1_ENCRYPTION_KEY_SALT,
            &V1_IV_SALT,
        )
    }

    fn sign(&self, data: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        if key.len() != AUTHENTICITY_KEY_SIZE {
            return Err(CoreError::invalid_key_size(AUTHENTICITY_KEY_SIZE, key.len()));
        }
        let mut hmac_key = derive_key(key, &V1_HMAC_KEY_SALT, AES_CTR_IV_SIZE)?;
        let tag = derive_key(data, &hmac_key, V1_HMAC_TAG_SIZE);
        hmac_key.zeroize();
        tag
    }

    fn tag_len(&self) -> usize {
        V1_HMAC_TAG_SIZE
    }
}

// ============================================
// IdentityV1Cryptor
// ============================================

/// The IdentityV1 protocol variant: 8-byte HMAC tags.
///
/// Signing here is salt-keyed: the second argument of [`Cryptor::sign`] is
/// fed to HKDF as the salt, with `data` as the input keying material. The
/// [`IdentityV1Cryptor::sign_with_default_salt`] form substitutes the
/// variant's fixed tag constant.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityV1Cryptor;

impl IdentityV1Cryptor {
    /// Creates an IdentityV1 cryptor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Signs `data` under the variant's fixed tag constant.
    ///
    /// # Errors
    /// `InvalidInput` if `data` is empty.
    pub fn sign_with_default_salt(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.sign(data, &IDENTITY_TAG_SALT)
    }

    /// Verifies a tag produced by [`Self::sign_with_default_salt`].
    #[must_use]
    pub fn verify_with_default_salt(&self, data: &[u8], tag: &[u8]) -> bool {
        self.verify(data, &IDENTITY_TAG_SALT, tag)
    }
}

impl Cryptor for IdentityV1Cryptor {
    fn encrypt(&self, plaintext: &[u8], salt: &[u8], authenticity_key: &[u8]) -> Result<Vec<u8>> {
        ctr_transform(
            plaintext,
            salt,
            authenticity_key,
            &IDENTITY_ENCRYPTION_KEY_SALT,
            &IDENTITY_IV_SALT,
        )
    }

    fn decrypt(
        &self,
        ciphertext: &[u8],
        salt: &[u8],
        authenticity_key: &[u8],
    ) -> Result<Vec<u8>> {
        ctr_transform(
            ciphertext,
            salt,
            authenticity_key,
            &IDENTITY_ENCRYPTION_KEY_SALT,
            &IDENTITY_IV_SALT,
        )
    }

    fn sign(&self, data: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        // `key` is the HKDF salt here, any length is acceptable
        derive_key(data, key, IDENTITY_V1_HMAC_TAG_SIZE)
    }

    fn tag_len(&self) -> usize {
        IDENTITY_V1_HMAC_TAG_SIZE
    }
}

// ============================================
// FakeCryptor
// ============================================

/// A cryptor that performs no transformation.
///
/// Test harnesses substitute this variant to observe plaintext on the
/// wire. `sign` always yields an all-zero 16-byte tag and `verify` accepts
/// exactly that tag.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeCryptor;

impl FakeCryptor {
    /// Creates a pass-through cryptor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Cryptor for FakeCryptor {
    fn encrypt(&self, plaintext: &[u8], _salt: &[u8], _authenticity_key: &[u8]) -> Result<Vec<u8>> {
        Ok(plaintext.to_vec())
    }

    fn decrypt(
        &self,
        ciphertext: &[u8],
        _salt: &[u8],
        _authenticity_key: &[u8],
    ) -> Result<Vec<u8>> {
        Ok(ciphertext.to_vec())
    }

    fn sign(&self, _data: &[u8], _key: &[u8]) -> Result<Vec<u8>> {
        Ok(vec![0u8; V1_HMAC_TAG_SIZE])
    }

    fn tag_len(&self) -> usize {
        V1_HMAC_TAG_SIZE
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // Interoperability vectors shared with deployed peers
    const AUTHENTICITY_KEY: [u8; 16] = hex!("a758ced69d3954e8790198f8e6b7dc64");
    const SALT: [u8; 2] = hex!("6616");
    const DATA: [u8; 14] = hex!("6b9a656b143e0249713b08f2c67a");
    const V1_ENCRYPTED: [u8; 14] = hex!("a45e9d9f51d0f977c0ea2dcfce5c");
    const V1_TAG: [u8; 16] = hex!("64589850be6bda5f2228c8e9a65aa90c");

    #[test]
    fn test_v1_encrypt_matches_published_vector() {
        let cryptor = CryptorV1::new();
        let encrypted = cryptor.encrypt(&DATA, &SALT, &AUTHENTICITY_KEY).unwrap();

        assert_ne!(&encrypted[..], &DATA[..]);
        assert_eq!(&encrypted[..], &V1_ENCRYPTED[..]);
    }

    #[test]
    fn test_v1_decrypt_matches_published_vector() {
        let cryptor = CryptorV1::new();
        let decrypted = cryptor
            .decrypt(&V1_ENCRYPTED, &SALT, &AUTHENTICITY_KEY)
            .unwrap();

        assert_eq!(&decrypted[..], &DATA[..]);
    }

    #[test]
    fn test_v1_roundtrip() {
        let cryptor = CryptorV1::new();
        let encrypted = cryptor.encrypt(&DATA, &SALT, &AUTHENTICITY_KEY).unwrap();
        let decrypted = cryptor.decrypt(&encrypted, &SALT, &AUTHENTICITY_KEY).unwrap();

        assert_eq!(&decrypted[..], &DATA[..]);
    }

    #[test]
    fn test_v1_rejects_wrong_key_size() {
        let cryptor = CryptorV1::new();
        let short_key = [1u8, 2, 3, 4, 6];

        assert!(matches!(
            cryptor.encrypt(&DATA, &SALT, &short_key),
            Err(CoreError::InvalidKeySize { expected: 16, actual: 5 })
        ));
        assert!(matches!(
            cryptor.decrypt(&V1_ENCRYPTED, &SALT, &short_key),
            Err(CoreError::InvalidKeySize { .. })
        ));
        assert!(matches!(
            cryptor.sign(&DATA, &short_key),
            Err(CoreError::InvalidKeySize { .. })
        ));
    }

    #[test]
    fn test_v1_sign_matches_published_vector() {
        let cryptor = CryptorV1::new();
        let tag = cryptor.sign(&DATA, &AUTHENTICITY_KEY).unwrap();

        assert_eq!(&tag[..], &V1_TAG[..]);
        assert_eq!(tag.len(), cryptor.tag_len());
    }

    #[test]
    fn test_v1_sign_deterministic() {
        let cryptor = CryptorV1::new();
        let t1 = cryptor.sign(&DATA, &AUTHENTICITY_KEY).unwrap();
        let t2 = cryptor.sign(&DATA, &AUTHENTICITY_KEY).unwrap();
        assert_eq!(t1, t2);
    }

    #[test]
    fn test_v1_verify() {
        let cryptor = CryptorV1::new();

        assert!(cryptor.verify(&DATA, &AUTHENTICITY_KEY, &V1_TAG));
        // Wrong-length tag never verifies
        assert!(!cryptor.verify(&DATA, &AUTHENTICITY_KEY, &DATA));
    }

    #[test]
    fn test_v1_verify_rejects_single_bit_flips() {
        let cryptor = CryptorV1::new();

        let mut bad_tag = V1_TAG;
        bad_tag[0] ^= 0x01;
        assert!(!cryptor.verify(&DATA, &AUTHENTICITY_KEY, &bad_tag));

        let mut bad_data = DATA;
        bad_data[13] ^= 0x80;
        assert!(!cryptor.verify(&bad_data, &AUTHENTICITY_KEY, &V1_TAG));

        let mut bad_key = AUTHENTICITY_KEY;
        bad_key[7] ^= 0x10;
        assert!(!cryptor.verify(&DATA, &bad_key, &V1_TAG));
    }

    #[test]
    fn test_identity_roundtrip() {
        let cryptor = IdentityV1Cryptor::new();
        let encrypted = cryptor.encrypt(&DATA, &SALT, &AUTHENTICITY_KEY).unwrap();
        let decrypted = cryptor.decrypt(&encrypted, &SALT, &AUTHENTICITY_KEY).unwrap();

        assert_ne!(&encrypted[..], &DATA[..]);
        assert_eq!(&decrypted[..], &DATA[..]);
    }

    #[test]
    fn test_identity_rejects_wrong_key_size() {
        let cryptor = IdentityV1Cryptor::new();
        let short_key = [1u8, 2, 3, 4, 6];

        assert!(matches!(
            cryptor.encrypt(&DATA, &SALT, &short_key),
            Err(CoreError::InvalidKeySize { .. })
        ));
    }

    #[test]
    fn test_identity_tag_is_eight_bytes() {
        let cryptor = IdentityV1Cryptor::new();
        let tag = cryptor.sign(&DATA, &SALT).unwrap();

        assert_eq!(tag.len(), 8);
        assert_eq!(cryptor.tag_len(), 8);
    }

    #[test]
    fn test_identity_sign_is_salt_keyed() {
        let cryptor = IdentityV1Cryptor::new();

        // Any-length second argument is legal; different salts give
        // different tags
        let t1 = cryptor.sign(&DATA, &SALT).unwrap();
        let t2 = cryptor.sign(&DATA, &AUTHENTICITY_KEY).unwrap();
        assert_ne!(t1, t2);

        assert!(cryptor.verify(&DATA, &SALT, &t1));
        assert!(!cryptor.verify(&DATA, &AUTHENTICITY_KEY, &t1));
    }

    #[test]
    fn test_identity_default_salt_sign_verify() {
        let cryptor = IdentityV1Cryptor::new();
        let tag = cryptor.sign_with_default_salt(&DATA).unwrap();

        assert_eq!(tag.len(), 8);
        assert!(cryptor.verify_with_default_salt(&DATA, &tag));

        let mut bad_tag = tag.clone();
        bad_tag[3] ^= 0x04;
        assert!(!cryptor.verify_with_default_salt(&DATA, &bad_tag));
    }

    #[test]
    fn test_variants_are_wire_incompatible() {
        let v1 = CryptorV1::new();
        let identity = IdentityV1Cryptor::new();

        let c1 = v1.encrypt(&DATA, &SALT, &AUTHENTICITY_KEY).unwrap();
        let c2 = identity.encrypt(&DATA, &SALT, &AUTHENTICITY_KEY).unwrap();

        // Disjoint domain constants produce unrelated ciphertexts
        assert_ne!(c1, c2);
    }

    #[test]
    fn test_fake_cryptor_passthrough() {
        let cryptor = FakeCryptor::new();

        let encrypted = cryptor.encrypt(&DATA, &SALT, &AUTHENTICITY_KEY).unwrap();
        assert_eq!(&encrypted[..], &DATA[..]);

        let decrypted = cryptor.decrypt(&encrypted, &SALT, &AUTHENTICITY_KEY).unwrap();
        assert_eq!(&decrypted[..], &DATA[..]);

        let tag = cryptor.sign(&DATA, &AUTHENTICITY_KEY).unwrap();
        assert_eq!(tag, vec![0u8; 16]);
        assert!(cryptor.verify(&DATA, &AUTHENTICITY_KEY, &tag));
    }
}
