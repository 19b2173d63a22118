// ============================================
// File: crates/bluepair-core/src/protocol/codec.rs
// ============================================
//! # Handshake Message Codec
//!
//! ## Creation Reason
//! Provides the fixed-layout binary encoding for handshake requests,
//! producing the exact 16-byte block the crypto layer encrypts.
//!
//! ## Main Functionality
//! - `Codec` trait: Generic encode/decode interface
//! - `MessageCodec`: Implementation for both request types
//! - Convenience functions returning ready-to-encrypt blocks
//!
//! ## Wire Format
//! Both request types share a common 8-byte prefix (type, flags,
//! provider address) followed by a type-specific payload, zero-padded
//! to exactly 16 bytes. All offsets are fixed.
//!
//! ## Parsing Strategy
//! 1. Check the buffer holds a full 16-byte block
//! 2. Read the message type byte
//! 3. Read fixed-offset fields for that type
//! 4. Validate variable-length payload bounds
//!
//! ## ⚠️ Important Note for Next Developer
//! - Always validate buffer lengths before reading
//! - Event data and the additional-data-type byte share byte 12;
//!   the overlap rule is enforced on both encode and decode
//! - Unknown flag bits are masked off, not rejected
//!
//! ## Last Modified
//! v0.1.0 - Initial codec implementation

use bytes::{BufMut, Bytes, BytesMut};

use bluepair_common::BluetoothAddress;

use crate::error::{CoreError, Result};
use crate::protocol::messages::{
    ActionFlags, ActionRequest, AdditionalDataType, KeyBasedPairingRequest, MessageType,
    RequestFlags, MESSAGE_SIZE,
};

// ============================================
// Layout Offsets
// ============================================

// Shared prefix.
const FLAGS_INDEX: usize = 1;
const VERIFICATION_DATA_INDEX: usize = 2;

// Key-based pairing payload.
const SEEKER_ADDRESS_INDEX: usize = 8;

// Action-over-BLE payload.
const EVENT_GROUP_INDEX: usize = 8;
const EVENT_CODE_INDEX: usize = 9;
const EVENT_DATA_LENGTH_INDEX: usize = 10;
const EVENT_DATA_INDEX: usize = 11;
const ADDITIONAL_DATA_TYPE_INDEX: usize = 12;

/// Longest event payload that fits between byte 11 and the end of the
/// block.
const EVENT_DATA_MAX: usize = MESSAGE_SIZE - EVENT_DATA_INDEX;

// ============================================
// Codec Trait
// ============================================

/// Trait for encoding and decoding handshake messages.
///
/// # Type Parameters
/// * `T` - The message type to encode/decode
pub trait Codec<T> {
    /// Encodes a message into a byte buffer.
    ///
    /// Always appends exactly [`MESSAGE_SIZE`] bytes on success.
    ///
    /// # Errors
    /// Returns an error if the message's variable-length payload does
    /// not fit the fixed layout.
    fn encode(&self, msg: &T, buf: &mut BytesMut) -> Result<()>;

    /// Decodes a message from bytes.
    ///
    /// # Errors
    /// Returns an error if the buffer is shorter than
    /// [`MESSAGE_SIZE`], carries the wrong type byte, or violates the
    /// payload layout.
    fn decode(&self, buf: &mut Bytes) -> Result<T>;
}

// ============================================
// MessageCodec
// ============================================

/// Codec implementation for both handshake request types.
#[derive(Debug, Default, Clone)]
pub struct MessageCodec;

impl MessageCodec {
    /// Creates a new message codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn check_block(buf: &[u8], expected_type: MessageType) -> Result<()> {
        if buf.len() < MESSAGE_SIZE {
            return Err(CoreError::truncated(MESSAGE_SIZE, buf.len()));
        }
        if buf[0] != expected_type.as_byte() {
            return Err(CoreError::malformed(format!(
                "expected type 0x{:02X}, got 0x{:02X}",
                expected_type.as_byte(),
                buf[0]
            )));
        }
        Ok(())
    }

    fn address_at(block: &[u8], index: usize) -> BluetoothAddress {
        let mut octets = [0u8; 6];
        octets.copy_from_slice(&block[index..index + 6]);
        BluetoothAddress::new(octets)
    }
}

// ============================================
// KeyBasedPairingRequest Codec
// ============================================

impl Codec<KeyBasedPairingRequest> for MessageCodec {
    fn encode(&self, msg: &KeyBasedPairingRequest, buf: &mut BytesMut) -> Result<()> {
        buf.reserve(MESSAGE_SIZE);
        buf.put_u8(MessageType::KeyBasedPairing.as_byte());
        buf.put_u8(msg.flags.bits());
        buf.put_slice(msg.provider_address.as_bytes());
        match &msg.seeker_public_address {
            Some(address) => buf.put_slice(address.as_bytes()),
            None => buf.put_bytes(0, 6),
        }
        // Reserved tail.
        buf.put_bytes(0, 2);
        Ok(())
    }

    fn decode(&self, buf: &mut Bytes) -> Result<KeyBasedPairingRequest> {
        Self::check_block(buf, MessageType::KeyBasedPairing)?;
        let block = buf.split_to(MESSAGE_SIZE);

        let flags = RequestFlags::from_bits_truncate(block[FLAGS_INDEX]);
        let provider_address = Self::address_at(&block, VERIFICATION_DATA_INDEX);

        let seeker = Self::address_at(&block, SEEKER_ADDRESS_INDEX);
        let seeker_public_address = if seeker.is_zero() { None } else { Some(seeker) };

        Ok(KeyBasedPairingRequest {
            provider_address,
            flags,
            seeker_public_address,
        })
    }
}

// ============================================
// ActionRequest Codec
// ============================================

impl Codec<ActionRequest> for MessageCodec {
    fn encode(&self, msg: &ActionRequest, buf: &mut BytesMut) -> Result<()> {
        let event_data = msg.event_data.as_deref().unwrap_or(&[]);
        let max = if msg.additional_data_type.is_some() {
            // Byte 12 is claimed by the additional-data-type.
            ADDITIONAL_DATA_TYPE_INDEX - EVENT_DATA_INDEX
        } else {
            EVENT_DATA_MAX
        };
        if event_data.len() > max {
            return Err(CoreError::malformed(format!(
                "event data of {} bytes does not fit ({} available)",
                event_data.len(),
                max
            )));
        }

        buf.reserve(MESSAGE_SIZE);
        buf.put_u8(MessageType::ActionOverBle.as_byte());
        buf.put_u8(msg.flags.bits());
        buf.put_slice(msg.provider_address.as_bytes());
        buf.put_u8(msg.event_group);
        buf.put_u8(msg.event_code);
        buf.put_u8(event_data.len() as u8);
        buf.put_slice(event_data);

        let written = EVENT_DATA_INDEX + event_data.len();
        match msg.additional_data_type {
            Some(data_type) => {
                buf.put_bytes(0, ADDITIONAL_DATA_TYPE_INDEX - written);
                buf.put_u8(data_type.as_byte());
                buf.put_bytes(0, MESSAGE_SIZE - ADDITIONAL_DATA_TYPE_INDEX - 1);
            }
            None => buf.put_bytes(0, MESSAGE_SIZE - written),
        }
        Ok(())
    }

    fn decode(&self, buf: &mut Bytes) -> Result<ActionRequest> {
        Self::check_block(buf, MessageType::ActionOverBle)?;
        let block = buf.split_to(MESSAGE_SIZE);

        let flags = ActionFlags::from_bits_truncate(block[FLAGS_INDEX]);
        let provider_address = Self::address_at(&block, VERIFICATION_DATA_INDEX);

        let event_group = block[EVENT_GROUP_INDEX];
        let event_code = block[EVENT_CODE_INDEX];
        let data_len = block[EVENT_DATA_LENGTH_INDEX] as usize;

        let follows_with_data = flags.contains(ActionFlags::ADDITIONAL_DATA_CHARACTERISTIC);
        let max = if follows_with_data {
            ADDITIONAL_DATA_TYPE_INDEX - EVENT_DATA_INDEX
        } else {
            EVENT_DATA_MAX
        };
        if data_len > max {
            return Err(CoreError::malformed(format!(
                "event data length {data_len} out of range ({max} available)"
            )));
        }

        let event_data = if data_len > 0 {
            Some(block[EVENT_DATA_INDEX..EVENT_DATA_INDEX + data_len].to_vec())
        } else {
            None
        };

        let additional_data_type = if follows_with_data {
            let byte = block[ADDITIONAL_DATA_TYPE_INDEX];
            Some(AdditionalDataType::from_byte(byte).ok_or_else(|| {
                CoreError::malformed(format!("unknown additional data type 0x{byte:02X}"))
            })?)
        } else {
            None
        };

        Ok(ActionRequest {
            provider_address,
            flags,
            event_group,
            event_code,
            event_data,
            additional_data_type,
        })
    }
}

// ============================================
// Convenience Functions
// ============================================

/// Identifies the message type from a buffer without consuming it.
///
/// # Errors
/// Returns an error if the buffer is empty or the type byte is
/// unknown.
pub fn peek_message_type(buf: &[u8]) -> Result<MessageType> {
    if buf.is_empty() {
        return Err(CoreError::truncated(1, 0));
    }
    MessageType::from_byte(buf[0]).ok_or(CoreError::UnknownMessageType(buf[0]))
}

/// Encodes a pairing request into a ready-to-encrypt block.
///
/// # Errors
/// Never fails for this message type; the `Result` keeps the contract
/// uniform with [`encode_action`].
pub fn encode_key_based_pairing(msg: &KeyBasedPairingRequest) -> Result<[u8; MESSAGE_SIZE]> {
    encode_block(msg)
}

/// Decodes a pairing request from a decrypted block.
///
/// # Errors
/// Returns an error if the buffer is short or carries the wrong type.
pub fn decode_key_based_pairing(buf: &[u8]) -> Result<KeyBasedPairingRequest> {
    let mut bytes = Bytes::copy_from_slice(buf);
    MessageCodec.decode(&mut bytes)
}

/// Encodes an action request into a ready-to-encrypt block.
///
/// # Errors
/// Returns an error if the event payload does not fit the layout.
pub fn encode_action(msg: &ActionRequest) -> Result<[u8; MESSAGE_SIZE]> {
    encode_block(msg)
}

/// Decodes an action request from a decrypted block.
///
/// # Errors
/// Returns an error if the buffer is short, carries the wrong type, or
/// violates the payload layout.
pub fn decode_action(buf: &[u8]) -> Result<ActionRequest> {
    let mut bytes = Bytes::copy_from_slice(buf);
    MessageCodec.decode(&mut bytes)
}

fn encode_block<T>(msg: &T) -> Result<[u8; MESSAGE_SIZE]>
where
    MessageCodec: Codec<T>,
{
    let mut buf = BytesMut::with_capacity(MESSAGE_SIZE);
    MessageCodec.encode(msg, &mut buf)?;
    debug_assert_eq!(buf.len(), MESSAGE_SIZE);
    let mut block = [0u8; MESSAGE_SIZE];
    block.copy_from_slice(&buf);
    Ok(block)
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    const PROVIDER: BluetoothAddress =
        BluetoothAddress::new([0xBB, 0xBB, 0xBB, 0xBB, 0xBB, 0x1E]);

    #[test]
    fn test_pairing_request_pinned_bytes() {
        let request =
            KeyBasedPairingRequest::new(PROVIDER, RequestFlags::REQUEST_DISCOVERABLE);
        let block = encode_key_based_pairing(&request).unwrap();

        assert_eq!(
            block,
            [
                0x00, 0x80, 0xBB, 0xBB, 0xBB, 0xBB, 0xBB, 0x1E, 0x00, 0x00, 0x00, 0x00, 0x00,
                0x00, 0x00, 0x00
            ]
        );
    }

    #[test]
    fn test_pairing_request_retroactive_flag_roundtrip() {
        let request =
            KeyBasedPairingRequest::new(PROVIDER, RequestFlags::REQUEST_RETROACTIVE_PAIR);
        let block = encode_key_based_pairing(&request).unwrap();
        assert_eq!(block.len(), MESSAGE_SIZE);

        let decoded = decode_key_based_pairing(&block).unwrap();
        assert!(decoded.flags.contains(RequestFlags::REQUEST_RETROACTIVE_PAIR));
        assert_eq!(decoded.flags, RequestFlags::REQUEST_RETROACTIVE_PAIR);
        assert_eq!(decoded.provider_address, PROVIDER);
        assert!(decoded.seeker_public_address.is_none());
    }

    #[test]
    fn test_pairing_request_seeker_address_roundtrip() {
        let seeker = BluetoothAddress::new([0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
        let request =
            KeyBasedPairingRequest::new(PROVIDER, RequestFlags::PROVIDER_INITIATES_BONDING)
                .with_seeker_public_address(seeker);

        let block = encode_key_based_pairing(&request).unwrap();
        assert_eq!(&block[8..14], seeker.as_bytes());

        let decoded = decode_key_based_pairing(&block).unwrap();
        assert_eq!(decoded.seeker_public_address, Some(seeker));
    }

    #[test]
    fn test_pairing_request_zero_seeker_block_decodes_none() {
        let mut block = [0u8; MESSAGE_SIZE];
        block[2..8].copy_from_slice(PROVIDER.as_bytes());
        let decoded = decode_key_based_pairing(&block).unwrap();
        assert!(decoded.seeker_public_address.is_none());
    }

    #[test]
    fn test_action_request_pinned_bytes() {
        let request = ActionRequest::new(PROVIDER)
            .with_event(0, 0)
            .with_event_data(vec![0x01])
            .with_additional_data_type(AdditionalDataType::PersonalizedName);

        let block = encode_action(&request).unwrap();
        assert_eq!(
            block,
            [
                0x10, 0xC0, 0xBB, 0xBB, 0xBB, 0xBB, 0xBB, 0x1E, 0x00, 0x00, 0x01, 0x01, 0x01,
                0x00, 0x00, 0x00
            ]
        );
    }

    #[test]
    fn test_action_request_roundtrip() {
        let request = ActionRequest::new(PROVIDER)
            .with_event(1, 2)
            .with_event_data(vec![0x05, 0x06, 0x07]);

        let block = encode_action(&request).unwrap();
        assert_eq!(block.len(), MESSAGE_SIZE);

        let decoded = decode_action(&block).unwrap();
        assert_eq!(decoded.event_group, 1);
        assert_eq!(decoded.event_code, 2);
        assert_eq!(decoded.event_data, Some(vec![0x05, 0x06, 0x07]));
        assert!(decoded.additional_data_type.is_none());
        assert!(decoded.flags.contains(ActionFlags::DEVICE_ACTION));
    }

    #[test]
    fn test_action_event_data_overflow() {
        let request = ActionRequest::new(PROVIDER)
            .with_event(1, 2)
            .with_event_data(vec![0u8; 6]);
        assert!(matches!(
            encode_action(&request),
            Err(CoreError::MalformedMessage { .. })
        ));
    }

    #[test]
    fn test_action_event_data_overlaps_additional_data_byte() {
        let request = ActionRequest::new(PROVIDER)
            .with_event(1, 2)
            .with_event_data(vec![0x01, 0x02])
            .with_additional_data_type(AdditionalDataType::PersonalizedName);
        assert!(matches!(
            encode_action(&request),
            Err(CoreError::MalformedMessage { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_short_buffer() {
        let short = [0u8; MESSAGE_SIZE - 1];
        assert!(matches!(
            decode_key_based_pairing(&short),
            Err(CoreError::TruncatedMessage {
                expected: MESSAGE_SIZE,
                actual: 15
            })
        ));
        assert!(matches!(
            decode_action(&short),
            Err(CoreError::TruncatedMessage { .. })
        ));
    }

    #[test]
    fn test_decode_wrong_message_type() {
        let request = ActionRequest::new(PROVIDER).with_event(0, 0);
        let block = encode_action(&request).unwrap();
        assert!(matches!(
            decode_key_based_pairing(&block),
            Err(CoreError::MalformedMessage { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_out_of_range_event_length() {
        let mut block = [0u8; MESSAGE_SIZE];
        block[0] = MessageType::ActionOverBle.as_byte();
        block[EVENT_DATA_LENGTH_INDEX] = 200;
        assert!(matches!(
            decode_action(&block),
            Err(CoreError::MalformedMessage { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_additional_data_type() {
        let mut block = [0u8; MESSAGE_SIZE];
        block[0] = MessageType::ActionOverBle.as_byte();
        block[FLAGS_INDEX] = ActionFlags::ADDITIONAL_DATA_CHARACTERISTIC.bits();
        block[ADDITIONAL_DATA_TYPE_INDEX] = 0x7F;
        assert!(matches!(
            decode_action(&block),
            Err(CoreError::MalformedMessage { .. })
        ));
    }

    #[test]
    fn test_decode_masks_unknown_flag_bits() {
        let mut block = [0u8; MESSAGE_SIZE];
        block[0] = MessageType::KeyBasedPairing.as_byte();
        block[FLAGS_INDEX] = 0xFF;
        block[VERIFICATION_DATA_INDEX..SEEKER_ADDRESS_INDEX]
            .copy_from_slice(PROVIDER.as_bytes());

        let decoded = decode_key_based_pairing(&block).unwrap();
        assert_eq!(decoded.flags, RequestFlags::all());
    }

    #[test]
    fn test_peek_message_type() {
        assert_eq!(
            peek_message_type(&[0x00]).unwrap(),
            MessageType::KeyBasedPairing
        );
        assert_eq!(
            peek_message_type(&[0x10]).unwrap(),
            MessageType::ActionOverBle
        );
        assert!(matches!(
            peek_message_type(&[0xFF]),
            Err(CoreError::UnknownMessageType(0xFF))
        ));
        assert!(matches!(
            peek_message_type(&[]),
            Err(CoreError::TruncatedMessage { .. })
        ));
    }

    #[test]
    fn test_encode_appends_exactly_one_block() {
        let pairing = KeyBasedPairingRequest::new(PROVIDER, RequestFlags::empty());
        let action = ActionRequest::new(PROVIDER)
            .with_event(3, 4)
            .with_additional_data_type(AdditionalDataType::None);

        let mut buf = BytesMut::new();
        MessageCodec.encode(&pairing, &mut buf).unwrap();
        assert_eq!(buf.len(), MESSAGE_SIZE);
        MessageCodec.encode(&action, &mut buf).unwrap();
        assert_eq!(buf.len(), 2 * MESSAGE_SIZE);
    }
}
