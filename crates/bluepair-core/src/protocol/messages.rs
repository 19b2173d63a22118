// ============================================
// File: crates/bluepair-core/src/protocol/messages.rs
// ============================================
//! # Handshake Message Definitions
//!
//! ## Creation Reason
//! Defines the typed forms of the two requests a seeker can write to a
//! provider's key-based pairing characteristic, and the response the
//! provider notifies back.
//!
//! ## Main Functionality
//! - `MessageType`: Enum for the request type byte
//! - `RequestFlags` / `ActionFlags`: per-type flag bitmasks
//! - `KeyBasedPairingRequest`: pairing request with optional seeker address
//! - `ActionRequest`: action-over-BLE request with event payload
//! - `HandshakeResponse`: decrypted 16-byte provider response
//!
//! ## Message Sizes
//! | Message | Size (bytes) |
//! |---------|--------------|
//! | KeyBasedPairingRequest | 16 |
//! | ActionRequest | 16 |
//! | HandshakeResponse | 16 |
//!
//! All three occupy exactly one cipher block; the codec zero-pads
//! encoded requests to [`MESSAGE_SIZE`].
//!
//! ## ⚠️ Important Note for Next Developer
//! - Byte offsets are fixed on the air - DO NOT reorder fields
//! - Flag bit positions are shared with deployed providers
//! - New message types need a new type byte, never a repurposed flag
//!
//! ## Last Modified
//! v0.1.0 - Initial message definitions

use bitflags::bitflags;
use bluepair_common::{BluetoothAddress, CommonError};

use crate::error::{CoreError, Result};

// ============================================
// Message Size Constants
// ============================================

/// Size of every encoded request and decrypted response in bytes.
pub const MESSAGE_SIZE: usize = 16;

// ============================================
// MessageType
// ============================================

/// Request type identifier.
///
/// # Wire Format
/// Single byte at the start of every request identifying its kind.
///
/// # Values
/// | Value | Type |
/// |-------|------|
/// | 0x00 | KeyBasedPairing |
/// | 0x10 | ActionOverBle |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    /// Key-based pairing request.
    KeyBasedPairing = 0x00,
    /// Action-over-BLE request.
    ActionOverBle = 0x10,
}

impl MessageType {
    /// Converts a byte to a MessageType.
    ///
    /// # Returns
    /// - `Some(MessageType)` if the byte is a valid request type
    /// - `None` if the byte is unknown
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::KeyBasedPairing),
            0x10 => Some(Self::ActionOverBle),
            _ => None,
        }
    }

    /// Converts the MessageType to its byte representation.
    #[must_use]
    pub const fn as_byte(&self) -> u8 {
        *self as u8
    }

    /// Checks if this is a key-based pairing request.
    #[must_use]
    pub const fn is_key_based_pairing(&self) -> bool {
        matches!(self, Self::KeyBasedPairing)
    }

    /// Checks if this is an action-over-BLE request.
    #[must_use]
    pub const fn is_action(&self) -> bool {
        matches!(self, Self::ActionOverBle)
    }
}

impl TryFrom<u8> for MessageType {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Self::from_byte(value).ok_or(value)
    }
}

impl From<MessageType> for u8 {
    fn from(msg_type: MessageType) -> Self {
        msg_type.as_byte()
    }
}

// ============================================
// Flag Bitmasks
// ============================================

bitflags! {
    /// Flags carried in byte 1 of a key-based pairing request.
    ///
    /// Bit positions are fixed on the air; providers mask off bits
    /// they do not understand.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RequestFlags: u8 {
        /// Ask the provider to enter discoverable mode.
        const REQUEST_DISCOVERABLE = 0x80;
        /// Ask the provider to initiate bonding to the seeker address
        /// carried in bytes 8..14.
        const PROVIDER_INITIATES_BONDING = 0x40;
        /// Ask the provider to notify its device name afterwards.
        const REQUEST_DEVICE_NAME = 0x20;
        /// This is a retroactive pair for an already-bonded provider.
        const REQUEST_RETROACTIVE_PAIR = 0x10;
    }
}

bitflags! {
    /// Flags carried in byte 1 of an action-over-BLE request.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ActionFlags: u8 {
        /// The request carries a device-action event in bytes 8..11.
        const DEVICE_ACTION = 0x80;
        /// The request will be followed by a write to the
        /// additional-data characteristic; byte 12 names its type.
        const ADDITIONAL_DATA_CHARACTERISTIC = 0x40;
    }
}

// ============================================
// AdditionalDataType
// ============================================

/// Identifies what the follow-up additional-data write will carry.
///
/// Only meaningful when [`ActionFlags::ADDITIONAL_DATA_CHARACTERISTIC`]
/// is set; byte 12 of the encoded request holds this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AdditionalDataType {
    /// No follow-up data.
    None = 0x00,
    /// The follow-up write carries a personalized device name.
    PersonalizedName = 0x01,
}

impl AdditionalDataType {
    /// Converts a byte to an AdditionalDataType, `None` if unknown.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::None),
            0x01 => Some(Self::PersonalizedName),
            _ => None,
        }
    }

    /// Converts the AdditionalDataType to its byte representation.
    #[must_use]
    pub const fn as_byte(&self) -> u8 {
        *self as u8
    }
}

// ============================================
// KeyBasedPairingRequest
// ============================================

/// Key-based pairing request written by the seeker.
///
/// # Purpose
/// Proves to the provider that the seeker holds the shared
/// authenticity key, and tells it which address the seeker saw it
/// advertise under.
///
/// # Wire Format (16 bytes)
/// ```text
/// ┌────────────────────────────────────────────┐
/// │ message_type (1 byte)         │ 0x00       │
/// ├────────────────────────────────────────────┤
/// │ flags (1 byte)                │ bitmask    │
/// ├────────────────────────────────────────────┤
/// │ provider_address (6 bytes)    │ BLE addr   │
/// ├────────────────────────────────────────────┤
/// │ seeker_address (6 bytes)      │ optional   │
/// ├────────────────────────────────────────────┤
/// │ reserved (2 bytes)            │ zero       │
/// └────────────────────────────────────────────┘
/// ```
///
/// The seeker address block is all zeros when absent; the decoder
/// treats an all-zero block as "not present".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBasedPairingRequest {
    /// Address the provider currently advertises under. The provider
    /// compares this against its own addresses to reject replays
    /// captured near a different device.
    pub provider_address: BluetoothAddress,
    /// Request flags (byte 1).
    pub flags: RequestFlags,
    /// Seeker's public address, required when
    /// [`RequestFlags::PROVIDER_INITIATES_BONDING`] is set.
    pub seeker_public_address: Option<BluetoothAddress>,
}

impl KeyBasedPairingRequest {
    /// Creates a new pairing request for the given provider address.
    #[must_use]
    pub const fn new(provider_address: BluetoothAddress, flags: RequestFlags) -> Self {
        Self {
            provider_address,
            flags,
            seeker_public_address: None,
        }
    }

    /// Attaches the seeker's public address.
    #[must_use]
    pub const fn with_seeker_public_address(mut self, address: BluetoothAddress) -> Self {
        self.seeker_public_address = Some(address);
        self
    }
}

// ============================================
// ActionRequest
// ============================================

/// Action-over-BLE request written by the seeker.
///
/// # Purpose
/// Drives a provider-side action (ring, rename, ...) over the same
/// authenticated characteristic without starting a pairing flow.
///
/// # Wire Format (16 bytes)
/// ```text
/// ┌────────────────────────────────────────────┐
/// │ message_type (1 byte)         │ 0x10       │
/// ├────────────────────────────────────────────┤
/// │ flags (1 byte)                │ bitmask    │
/// ├────────────────────────────────────────────┤
/// │ provider_address (6 bytes)    │ BLE addr   │
/// ├────────────────────────────────────────────┤
/// │ event_group (1 byte)          │            │
/// ├────────────────────────────────────────────┤
/// │ event_code (1 byte)           │            │
/// ├────────────────────────────────────────────┤
/// │ event_data_length (1 byte)    │            │
/// ├────────────────────────────────────────────┤
/// │ event_data (0-5 bytes)        │ from 11    │
/// ├────────────────────────────────────────────┤
/// │ padding                       │ zero       │
/// └────────────────────────────────────────────┘
/// ```
///
/// Byte 12 doubles as the additional-data-type byte when
/// [`ActionFlags::ADDITIONAL_DATA_CHARACTERISTIC`] is set, which caps
/// event data at one byte for such requests. The codec enforces the
/// overlap rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    /// Address the provider currently advertises under.
    pub provider_address: BluetoothAddress,
    /// Action flags (byte 1).
    pub flags: ActionFlags,
    /// Event group (byte 8). Zero when no event is attached.
    pub event_group: u8,
    /// Event code (byte 9). Zero when no event is attached.
    pub event_code: u8,
    /// Optional event payload, written from byte 11.
    pub event_data: Option<Vec<u8>>,
    /// Type of the follow-up additional-data write (byte 12).
    pub additional_data_type: Option<AdditionalDataType>,
}

impl ActionRequest {
    /// Creates a new action request with no event and no flags.
    #[must_use]
    pub const fn new(provider_address: BluetoothAddress) -> Self {
        Self {
            provider_address,
            flags: ActionFlags::empty(),
            event_group: 0,
            event_code: 0,
            event_data: None,
            additional_data_type: None,
        }
    }

    /// Attaches a device-action event.
    ///
    /// Setting an event implies [`ActionFlags::DEVICE_ACTION`]; the
    /// flag is inserted here so the two can never disagree.
    #[must_use]
    pub fn with_event(mut self, group: u8, code: u8) -> Self {
        self.event_group = group;
        self.event_code = code;
        self.flags.insert(ActionFlags::DEVICE_ACTION);
        self
    }

    /// Attaches an event payload.
    #[must_use]
    pub fn with_event_data(mut self, data: Vec<u8>) -> Self {
        self.event_data = Some(data);
        self
    }

    /// Announces a follow-up additional-data write of the given type.
    ///
    /// Implies [`ActionFlags::ADDITIONAL_DATA_CHARACTERISTIC`].
    #[must_use]
    pub fn with_additional_data_type(mut self, data_type: AdditionalDataType) -> Self {
        self.additional_data_type = Some(data_type);
        self.flags.insert(ActionFlags::ADDITIONAL_DATA_CHARACTERISTIC);
        self
    }
}

// ============================================
// HandshakeResponse
// ============================================

/// Decrypted 16-byte response notified by the provider.
///
/// # Wire Format (16 bytes)
/// ```text
/// ┌────────────────────────────────────────────┐
/// │ response_type (1 byte)        │ 0x01       │
/// ├────────────────────────────────────────────┤
/// │ provider_address (6 bytes)    │ public     │
/// ├────────────────────────────────────────────┤
/// │ salt (9 bytes)                │ random     │
/// └────────────────────────────────────────────┘
/// ```
///
/// The provider returns its public (bondable) address here, which may
/// differ from the rotating address the request was sent to. The
/// trailing salt bytes keep the encrypted block unique per handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandshakeResponse([u8; MESSAGE_SIZE]);

impl HandshakeResponse {
    /// Response type byte for a successful key-based pairing response.
    pub const KEY_BASED_PAIRING_RESPONSE: u8 = 0x01;

    /// Wraps a decrypted response block.
    ///
    /// # Errors
    /// Returns an error if `bytes` is not exactly 16 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != MESSAGE_SIZE {
            return Err(CommonError::invalid_length(MESSAGE_SIZE, bytes.len()).into());
        }
        let mut block = [0u8; MESSAGE_SIZE];
        block.copy_from_slice(bytes);
        Ok(Self(block))
    }

    /// Returns the response type byte.
    #[must_use]
    pub const fn response_type(&self) -> u8 {
        self.0[0]
    }

    /// Checks whether this is a key-based pairing response.
    #[must_use]
    pub const fn is_key_based_pairing_response(&self) -> bool {
        self.0[0] == Self::KEY_BASED_PAIRING_RESPONSE
    }

    /// Returns the provider's public address from bytes 1..7.
    #[must_use]
    pub fn provider_address(&self) -> BluetoothAddress {
        let mut octets = [0u8; 6];
        octets.copy_from_slice(&self.0[1..7]);
        BluetoothAddress::new(octets)
    }

    /// Returns the raw response block.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; MESSAGE_SIZE] {
        &self.0
    }

    /// Validates the response type byte.
    ///
    /// # Errors
    /// Returns [`CoreError::MalformedMessage`] if the type byte is not
    /// a key-based pairing response.
    pub fn require_key_based_pairing_response(&self) -> Result<()> {
        if self.is_key_based_pairing_response() {
            Ok(())
        } else {
            Err(CoreError::malformed(format!(
                "unexpected response type 0x{:02X}",
                self.0[0]
            )))
        }
    }
}

impl AsRef<[u8]> for HandshakeResponse {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    fn address(last: u8) -> BluetoothAddress {
        BluetoothAddress::new([0xBB, 0xBB, 0xBB, 0xBB, 0xBB, last])
    }

    #[test]
    fn test_message_type_from_byte() {
        assert_eq!(MessageType::from_byte(0x00), Some(MessageType::KeyBasedPairing));
        assert_eq!(MessageType::from_byte(0x10), Some(MessageType::ActionOverBle));
        assert_eq!(MessageType::from_byte(0x01), None);
        assert_eq!(MessageType::from_byte(0xFF), None);
    }

    #[test]
    fn test_message_type_roundtrip() {
        for msg_type in [MessageType::KeyBasedPairing, MessageType::ActionOverBle] {
            assert_eq!(MessageType::from_byte(msg_type.as_byte()), Some(msg_type));
        }
    }

    #[test]
    fn test_message_type_predicates() {
        assert!(MessageType::KeyBasedPairing.is_key_based_pairing());
        assert!(!MessageType::KeyBasedPairing.is_action());
        assert!(MessageType::ActionOverBle.is_action());
    }

    #[test]
    fn test_message_type_try_from_unknown() {
        assert_eq!(MessageType::try_from(0x20), Err(0x20));
    }

    #[test]
    fn test_request_flag_bits() {
        assert_eq!(RequestFlags::REQUEST_DISCOVERABLE.bits(), 0x80);
        assert_eq!(RequestFlags::PROVIDER_INITIATES_BONDING.bits(), 0x40);
        assert_eq!(RequestFlags::REQUEST_DEVICE_NAME.bits(), 0x20);
        assert_eq!(RequestFlags::REQUEST_RETROACTIVE_PAIR.bits(), 0x10);
    }

    #[test]
    fn test_action_flag_bits() {
        assert_eq!(ActionFlags::DEVICE_ACTION.bits(), 0x80);
        assert_eq!(ActionFlags::ADDITIONAL_DATA_CHARACTERISTIC.bits(), 0x40);
    }

    #[test]
    fn test_with_event_implies_device_action() {
        let request = ActionRequest::new(address(0x1E)).with_event(0, 0);
        assert!(request.flags.contains(ActionFlags::DEVICE_ACTION));
        assert_eq!(request.event_group, 0);
        assert_eq!(request.event_code, 0);
    }

    #[test]
    fn test_with_additional_data_type_implies_flag() {
        let request = ActionRequest::new(address(0x1E))
            .with_additional_data_type(AdditionalDataType::PersonalizedName);
        assert!(request
            .flags
            .contains(ActionFlags::ADDITIONAL_DATA_CHARACTERISTIC));
    }

    #[test]
    fn test_pairing_request_seeker_address() {
        let request = KeyBasedPairingRequest::new(address(0x1E), RequestFlags::empty());
        assert!(request.seeker_public_address.is_none());

        let request = request.with_seeker_public_address(address(0x2F));
        assert_eq!(request.seeker_public_address, Some(address(0x2F)));
    }

    #[test]
    fn test_response_accessors() {
        let mut block = [0u8; MESSAGE_SIZE];
        block[0] = HandshakeResponse::KEY_BASED_PAIRING_RESPONSE;
        block[1..7].copy_from_slice(&[0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
        let response = HandshakeResponse::from_bytes(&block).unwrap();

        assert!(response.is_key_based_pairing_response());
        assert!(response.require_key_based_pairing_response().is_ok());
        assert_eq!(
            response.provider_address(),
            BluetoothAddress::new([0x11, 0x22, 0x33, 0x44, 0x55, 0x66])
        );
    }

    #[test]
    fn test_response_rejects_wrong_length() {
        assert!(HandshakeResponse::from_bytes(&[0u8; 15]).is_err());
        assert!(HandshakeResponse::from_bytes(&[0u8; 17]).is_err());
    }

    #[test]
    fn test_response_rejects_unknown_type() {
        let mut block = [0u8; MESSAGE_SIZE];
        block[0] = 0x7F;
        let response = HandshakeResponse::from_bytes(&block).unwrap();
        assert!(!response.is_key_based_pairing_response());
        assert!(matches!(
            response.require_key_based_pairing_response(),
            Err(CoreError::MalformedMessage { .. })
        ));
    }
}
