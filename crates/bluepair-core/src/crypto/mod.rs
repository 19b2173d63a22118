// ============================================
// File: crates/bluepair-core/src/crypto/mod.rs
// ============================================
//! # Cryptography Module
//!
//! ## Creation Reason
//! Centralizes all cryptographic operations for the bluepair handshake,
//! using audited RustCrypto implementations.
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`kdf`]: Key derivation (HKDF-SHA256 with domain-separation salts)
//! - [`cryptor`]: Symmetric encrypt/decrypt and sign/verify (two protocol
//!   variants plus a pass-through test variant)
//! - [`block`]: Single-block cipher wrapping the on-air handshake payload
//! - [`keys`]: Public key material carried alongside the first write
//!
//! ## Cryptographic Design
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Handshake Payload Path                    │
//! │                                                              │
//! │   Request ──► MessageCodec ──► 16 bytes                      │
//! │                                   │                          │
//! │   AuthenticityKey ──────────► block::encrypt (AES-128)       │
//! │                                   │                          │
//! │                                   ▼                          │
//! │            ciphertext [ || public key material ]             │
//! └──────────────────────────────────────────────────────────────┘
//!
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Broadcast Payload Path                    │
//! │                                                              │
//! │   AuthenticityKey ──HKDF──► encryption key (32)              │
//! │   Salt ───────────── HKDF──► effective IV (16)               │
//! │                                   │                          │
//! │                       AES-256-CTR keystream                  │
//! │                                   │                          │
//! │                  ciphertext + HKDF-derived HMAC tag          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Properties
//! - **Confidentiality**: AES-256-CTR with per-message derived IVs
//! - **Integrity**: HKDF-derived HMAC tags (16 bytes V1, 8 bytes IdentityV1)
//! - **Domain separation**: Disjoint 16-byte constants per variant and purpose
//!
//! ## ⚠️ Important Note for Next Developer
//! - ALL implementations use RustCrypto (audited)
//! - NEVER roll your own crypto
//! - The domain constants are wire-protocol values shared with peers;
//!   changing one byte breaks interoperability silently
//! - Test vectors must keep matching the published ones in cryptor.rs
//!
//! ## Last Modified
//! v0.1.0 - Initial crypto implementation

pub mod block;
pub mod cryptor;
pub mod kdf;
pub mod keys;

// Re-export primary types at module level
pub use cryptor::{Cryptor, CryptorV1, FakeCryptor, IdentityV1Cryptor};
pub use keys::PublicKeyMaterial;

// ============================================
// Constants
// ============================================

/// Size of the shared authenticity key in bytes.
pub const AUTHENTICITY_KEY_SIZE: usize = 16;

/// Size of one cipher block (and of every handshake message) in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Size of the derived AES-256-CTR encryption key in bytes.
pub const ENCRYPTION_KEY_SIZE: usize = 32;

/// Size of the derived CTR initialization vector in bytes.
pub const AES_CTR_IV_SIZE: usize = 16;

/// HMAC tag length for the V1 variant in bytes.
pub const V1_HMAC_TAG_SIZE: usize = 16;

/// HMAC tag length for the IdentityV1 variant in bytes.
pub const IDENTITY_V1_HMAC_TAG_SIZE: usize = 8;

/// Size of the public key material accompanying an initial pairing request.
pub const PUBLIC_KEY_MATERIAL_SIZE: usize = 64;
