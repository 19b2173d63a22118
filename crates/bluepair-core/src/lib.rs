// ============================================
// File: crates/bluepair-core/src/lib.rs
// ============================================
//! # BluePair Core - Protocol & Cryptography Library
//!
//! ## Creation Reason
//! Provides the handshake wire protocol and the symmetric cryptography
//! that protects it. Everything a seeker or provider needs to build,
//! seal, and interpret handshake blocks lives here.
//!
//! ## Main Functionality
//!
//! ### Protocol Module ([`protocol`])
//! - Request definitions (`KeyBasedPairingRequest`, `ActionRequest`)
//! - Fixed-layout codec producing exact 16-byte blocks
//! - `HandshakeResponse` accessor type
//!
//! ### Crypto Module ([`crypto`])
//! - HKDF-SHA256 key derivation with fixed domain constants
//! - `Cryptor` variants (V1, IdentityV1, Fake) for payload protection
//! - Single-block AES wrapping of encoded requests
//! - `PublicKeyMaterial` carried on initial pairing writes
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │             bluepair-seeker                         │
//! │                    │                                │
//! │         ┌──────────┴──────────┐                    │
//! │         ▼                     ▼                    │
//! │   bluepair-core  ◄──    bluepair-gatt              │
//! │   You are here        │                            │
//! │         │             │                            │
//! │         └──────────┬──────────┘                    │
//! │                    ▼                               │
//! │             bluepair-common                        │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Guarantees
//! - **Confidentiality**: AES-256-CTR on broadcast payloads, AES-128
//!   on handshake blocks
//! - **Integrity**: HKDF-derived HMAC tags (16 or 8 bytes per variant)
//! - **Key Separation**: distinct domain constants per derived key
//!   purpose, never shared across cryptor variants
//!
//! ## ⚠️ Important Note for Next Developer
//! - ALL cryptographic code uses audited RustCrypto implementations
//! - NEVER implement custom crypto primitives
//! - Derived key buffers MUST be zeroized after use
//! - Wire offsets and domain constants are frozen by deployed
//!   providers; the pinned-vector tests guard them
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod crypto;
pub mod error;
pub mod protocol;

// Re-export commonly used items
pub use crypto::{
    Cryptor, CryptorV1, FakeCryptor, IdentityV1Cryptor, PublicKeyMaterial,
};
pub use error::{CoreError, Result};
pub use protocol::{
    ActionRequest, HandshakeResponse, KeyBasedPairingRequest, MessageType, MESSAGE_SIZE,
};
