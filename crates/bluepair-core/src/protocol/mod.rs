// ============================================
// File: crates/bluepair-core/src/protocol/mod.rs
// ============================================
//! # Protocol Module
//!
//! ## Creation Reason
//! Defines the wire protocol carried over the key-based pairing
//! characteristic, including request types, layouts, and the codec.
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`messages`]: Request and response structures
//! - [`codec`]: Fixed-layout binary encoding/decoding
//!
//! ### Message Types
//! - `KeyBasedPairingRequest`: Starts an authenticated pairing flow
//! - `ActionRequest`: Drives a provider action without pairing
//! - `HandshakeResponse`: Provider's decrypted 16-byte reply
//!
//! ## Protocol Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Handshake Exchange                       │
//! │                                                             │
//! │  Seeker ── write: encrypted request (16 or 80 B) ► Provider │
//! │  Seeker ◄──── notify: encrypted response (16 B) ── Provider │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format Principles
//! - Every plaintext block is exactly 16 bytes (one cipher block)
//! - Fixed byte offsets, zero padding fills unused tail bytes
//! - Flag bitmasks in byte 1, meaning depends on the type byte
//! - Unknown flag bits are masked off for forward compatibility
//!
//! ## ⚠️ Important Note for Next Developer
//! - Offsets are shared with deployed providers and never move
//! - Keep the pinned-byte tests in [`codec`] green when touching
//!   anything here
//!
//! ## Last Modified
//! v0.1.0 - Initial protocol definitions

pub mod codec;
pub mod messages;

// Re-export primary types
pub use codec::{
    decode_action, decode_key_based_pairing, encode_action, encode_key_based_pairing,
    peek_message_type, Codec, MessageCodec,
};
pub use messages::{
    ActionFlags, ActionRequest, AdditionalDataType, HandshakeResponse, KeyBasedPairingRequest,
    MessageType, RequestFlags, MESSAGE_SIZE,
};
