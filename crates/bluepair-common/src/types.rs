// ============================================
// File: crates/bluepair-common/src/types.rs
// ============================================
//! # Core Type Definitions
//!
//! ## Creation Reason
//! Centralizes the fundamental value types shared by every layer of the
//! bluepair stack, ensuring type safety and consistent representations.
//!
//! ## Main Functionality
//! - `BluetoothAddress`: 6-byte public or resolvable BLE device address
//! - `AuthenticityKey`: 16-byte shared secret used to protect the handshake
//! - `ModelId`: 24-bit device model identifier from the advertisement
//!
//! ## Main Logical Flow
//! 1. Addresses and model ids are captured from scan results
//! 2. The authenticity key is loaded from account storage or pairing input
//! 3. All three are carried through the handshake and sighting layers
//! 4. The key is securely zeroed on drop
//!
//! ## ⚠️ Important Note for Next Developer
//! - AuthenticityKey is security-critical: it never implements Display and
//!   its Debug output is redacted to the first two bytes
//! - AuthenticityKey implements Zeroize and a manual Drop
//! - Address bytes are kept in display order (most significant byte first),
//!   the same order they cross the wire
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use zeroize::Zeroize;

// ============================================
// Constants
// ============================================

/// Size of a BLE device address in bytes
pub const ADDRESS_SIZE: usize = 6;

/// Size of the shared authenticity key in bytes
pub const AUTHENTICITY_KEY_SIZE: usize = 16;

/// Largest value representable by a 24-bit model id
pub const MODEL_ID_MAX: u32 = 0x00FF_FFFF;

// ============================================
// Parse Error Types
// ============================================

/// Error type for `BluetoothAddress` parsing failures
#[derive(Debug, Clone)]
pub enum AddressParseError {
    /// Input did not have six colon-separated octets
    InvalidFormat(String),
    /// An octet was not valid two-digit hex
    InvalidOctet(String),
}

impl fmt::Display for AddressParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => {
                write!(f, "Invalid address format: {} (expected AA:BB:CC:DD:EE:FF)", s)
            }
            Self::InvalidOctet(s) => write!(f, "Invalid address octet: {}", s),
        }
    }
}

impl std::error::Error for AddressParseError {}

/// Error type for `AuthenticityKey` parsing failures
#[derive(Debug, Clone)]
pub enum KeyParseError {
    /// Hex decoding failed
    InvalidHex(String),
    /// Decoded bytes have wrong length
    InvalidLength { expected: usize, actual: usize },
}

impl fmt::Display for KeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHex(msg) => write!(f, "Invalid hex: {}", msg),
            Self::InvalidLength { expected, actual } => {
                write!(f, "Invalid length: expected {}, got {}", expected, actual)
            }
        }
    }
}

impl std::error::Error for KeyParseError {}

// ============================================
// BluetoothAddress
// ============================================

/// A 6-byte BLE device address.
///
/// Wraps the raw octets to prevent confusion with other 6-byte values and
/// to keep one canonical byte order everywhere: display order, most
/// significant byte first, which is also the order the octets are written
/// into handshake messages.
///
/// # Wire Format
/// ```text
/// ┌────┬────┬────┬────┬────┬────┐
/// │ A1 │ A2 │ A3 │ A4 │ A5 │ A6 │   "A1:A2:A3:A4:A5:A6"
/// └────┴────┴────┴────┴────┴────┘
/// ```
///
/// # Example
/// ```
/// use bluepair_common::types::BluetoothAddress;
///
/// let addr: BluetoothAddress = "11:22:33:44:55:66".parse().unwrap();
/// assert_eq!(addr.as_bytes(), &[0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
/// assert_eq!(addr.to_string(), "11:22:33:44:55:66");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BluetoothAddress([u8; ADDRESS_SIZE]);

impl BluetoothAddress {
    /// Creates an address from exactly six raw octets.
    #[must_use]
    pub const fn new(octets: [u8; ADDRESS_SIZE]) -> Self {
        Self(octets)
    }

    /// Creates an address from a byte slice.
    ///
    /// # Returns
    /// - `Some(BluetoothAddress)` if the slice is exactly 6 bytes
    /// - `None` otherwise
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != ADDRESS_SIZE {
            return None;
        }
        let mut octets = [0u8; ADDRESS_SIZE];
        octets.copy_from_slice(bytes);
        Some(Self(octets))
    }

    /// Returns the raw octets in display order.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    /// Returns the raw octets by value.
    #[must_use]
    pub const fn octets(&self) -> [u8; ADDRESS_SIZE] {
        self.0
    }

    /// Returns true if every octet is zero.
    ///
    /// An all-zero address is not a valid peer and marks "absent" in
    /// fixed-layout messages.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_SIZE]
    }
}

impl fmt::Display for BluetoothAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for BluetoothAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != ADDRESS_SIZE {
            return Err(AddressParseError::InvalidFormat(s.to_string()));
        }
        let mut octets = [0u8; ADDRESS_SIZE];
        for (octet, part) in octets.iter_mut().zip(&parts) {
            if part.len() != 2 {
                return Err(AddressParseError::InvalidOctet((*part).to_string()));
            }
            *octet = u8::from_str_radix(part, 16)
                .map_err(|_| AddressParseError::InvalidOctet((*part).to_string()))?;
        }
        Ok(Self(octets))
    }
}

impl From<[u8; ADDRESS_SIZE]> for BluetoothAddress {
    fn from(octets: [u8; ADDRESS_SIZE]) -> Self {
        Self(octets)
    }
}

impl AsRef<[u8]> for BluetoothAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ============================================
// AuthenticityKey
// ============================================

/// The 16-byte shared secret protecting a handshake.
///
/// # Security Properties
/// - Fixed 16-byte size (128 bits)
/// - Implements `Zeroize` with a manual `Drop` for secure cleanup
/// - Does NOT implement `Copy` due to secure drop behavior
/// - Debug output is redacted; there is no Display impl
///
/// # Example
/// ```
/// use bluepair_common::types::AuthenticityKey;
///
/// let key = AuthenticityKey::generate();
/// let restored = AuthenticityKey::from_bytes(key.as_bytes()).unwrap();
/// assert_eq!(key, restored);
/// ```
#[derive(Clone, PartialEq, Eq, Zeroize)]
pub struct AuthenticityKey([u8; AUTHENTICITY_KEY_SIZE]);

impl Drop for AuthenticityKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl AuthenticityKey {
    /// Creates a key from a byte slice.
    ///
    /// # Returns
    /// - `Some(AuthenticityKey)` if the slice is exactly 16 bytes
    /// - `None` otherwise
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != AUTHENTICITY_KEY_SIZE {
            return None;
        }
        let mut key = [0u8; AUTHENTICITY_KEY_SIZE];
        key.copy_from_slice(bytes);
        Some(Self(key))
    }

    /// Generates a new cryptographically random key.
    ///
    /// Uses the system's secure random number generator.
    #[must_use]
    pub fn generate() -> Self {
        let mut key = [0u8; AUTHENTICITY_KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut key);
        Self(key)
    }

    /// Returns the raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; AUTHENTICITY_KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for AuthenticityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only the first two bytes appear in logs
        write!(f, "AuthenticityKey({:02x}{:02x}...)", self.0[0], self.0[1])
    }
}

impl FromStr for AuthenticityKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| KeyParseError::InvalidHex(e.to_string()))?;

        Self::from_bytes(&bytes).ok_or(KeyParseError::InvalidLength {
            expected: AUTHENTICITY_KEY_SIZE,
            actual: bytes.len(),
        })
    }
}

impl AsRef<[u8]> for AuthenticityKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ============================================
// ModelId
// ============================================

/// The 24-bit model identifier a device advertises.
///
/// Keys the sighting log: every advertisement callback records the model id
/// together with the address it was seen from.
///
/// # Example
/// ```
/// use bluepair_common::types::ModelId;
///
/// let model = ModelId::from_u32(0x00AA_BB01).unwrap();
/// assert_eq!(model.to_string(), "AABB01");
/// assert_eq!(model.to_bytes(), [0xAA, 0xBB, 0x01]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(u32);

impl ModelId {
    /// Creates a model id from a `u32`.
    ///
    /// # Returns
    /// - `Some(ModelId)` if the value fits in 24 bits
    /// - `None` otherwise
    #[must_use]
    pub const fn from_u32(value: u32) -> Option<Self> {
        if value > MODEL_ID_MAX {
            return None;
        }
        Some(Self(value))
    }

    /// Creates a model id from its three big-endian bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self(((bytes[0] as u32) << 16) | ((bytes[1] as u32) << 8) | (bytes[2] as u32))
    }

    /// Returns the raw 24-bit value.
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Returns the three big-endian bytes.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06X}", self.0)
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_roundtrip() {
        let original = BluetoothAddress::new([0xA1, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6]);

        // Byte roundtrip
        let restored = BluetoothAddress::from_bytes(original.as_bytes()).unwrap();
        assert_eq!(original, restored);

        // String roundtrip
        let s = original.to_string();
        assert_eq!(s, "A1:A2:A3:A4:A5:A6");
        let parsed: BluetoothAddress = s.parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_address_parse_lowercase() {
        let parsed: BluetoothAddress = "aa:bb:cc:dd:ee:ff".parse().unwrap();
        assert_eq!(parsed.as_bytes(), &[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
    }

    #[test]
    fn test_address_parse_invalid() {
        assert!("11:22:33:44:55".parse::<BluetoothAddress>().is_err());
        assert!("11:22:33:44:55:66:77".parse::<BluetoothAddress>().is_err());
        assert!("11:22:33:44:55:GG".parse::<BluetoothAddress>().is_err());
        assert!("112233445566".parse::<BluetoothAddress>().is_err());
        assert!("11:22:33:44:55:6".parse::<BluetoothAddress>().is_err());
    }

    #[test]
    fn test_address_invalid_length() {
        assert!(BluetoothAddress::from_bytes(&[0u8; 5]).is_none());
        assert!(BluetoothAddress::from_bytes(&[0u8; 7]).is_none());
    }

    #[test]
    fn test_address_is_zero() {
        assert!(BluetoothAddress::new([0u8; 6]).is_zero());
        assert!(!BluetoothAddress::new([0, 0, 0, 0, 0, 1]).is_zero());
    }

    #[test]
    fn test_key_generation() {
        let k1 = AuthenticityKey::generate();
        let k2 = AuthenticityKey::generate();

        // Two random keys should be different
        assert_ne!(k1, k2);
        assert_eq!(k1.as_bytes().len(), AUTHENTICITY_KEY_SIZE);
    }

    #[test]
    fn test_key_hex_roundtrip() {
        let parsed: AuthenticityKey = "0123456789ABCDEF0123456789ABCDEF".parse().unwrap();
        assert_eq!(
            parsed.as_bytes(),
            &[
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0x01, 0x23, 0x45, 0x67, 0x89,
                0xAB, 0xCD, 0xEF
            ]
        );
    }

    #[test]
    fn test_key_invalid_length() {
        assert!(AuthenticityKey::from_bytes(&[0u8; 5]).is_none());
        assert!(AuthenticityKey::from_bytes(&[0u8; 32]).is_none());
        assert!("0123456789".parse::<AuthenticityKey>().is_err());
    }

    #[test]
    fn test_key_debug_redacted() {
        let key = AuthenticityKey::from_bytes(&[0xAB; 16]).unwrap();
        let debug = format!("{:?}", key);
        assert!(debug.contains("abab"));
        assert!(!debug.contains("abababab"));
    }

    #[test]
    fn test_model_id_range() {
        assert!(ModelId::from_u32(0).is_some());
        assert!(ModelId::from_u32(MODEL_ID_MAX).is_some());
        assert!(ModelId::from_u32(MODEL_ID_MAX + 1).is_none());
    }

    #[test]
    fn test_model_id_bytes() {
        let model = ModelId::from_bytes([0xAA, 0xBB, 0x01]);
        assert_eq!(model.as_u32(), 0x00AA_BB01);
        assert_eq!(model.to_bytes(), [0xAA, 0xBB, 0x01]);
        assert_eq!(model.to_string(), "AABB01");
    }
}
