// ============================================
// File: crates/bluepair-gatt/src/traits.rs
// ============================================
//! # GATT Connection Traits
//!
//! ## Creation Reason
//! Defines the abstract interface the handshake layer uses to talk to
//! a connected provider, so platform adapters and test doubles plug in
//! behind the same contract.
//!
//! ## Main Functionality
//! - `GattConnection`: write + notification interface to one peer
//! - `CharacteristicId`: 128-bit characteristic identifier
//! - `ChangeObserver`: bounded wait for characteristic notifications
//!
//! ## Design Philosophy
//! - Traits enable mock implementations for testing
//! - Async-first design with `async_trait`
//! - The connection is owned by the caller; consumers never close it
//!
//! ## ⚠️ Important Note for Next Developer
//! - Implementations must be Send + Sync for use in async contexts
//! - `ChangeObserver` buffers notifications that arrive between
//!   waits; dropping it silently discards anything buffered
//!
//! ## Last Modified
//! v0.1.0 - Initial trait definitions

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::timeout;

use bluepair_common::BluetoothAddress;

use crate::error::{GattError, Result};

// ============================================
// CharacteristicId
// ============================================

/// 128-bit GATT characteristic identifier.
///
/// # Purpose
/// Names which characteristic an operation targets. Custom services
/// use full 128-bit values; standard characteristics can be built
/// from their 16-bit shorthand via [`CharacteristicId::from_u16`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharacteristicId(u128);

/// Bluetooth base UUID that 16-bit shorthands expand into.
const BLUETOOTH_BASE_UUID: u128 = 0x0000_0000_0000_1000_8000_0080_5F9B_34FB;

impl CharacteristicId {
    /// Creates an identifier from a full 128-bit UUID value.
    #[must_use]
    pub const fn new(uuid: u128) -> Self {
        Self(uuid)
    }

    /// Expands a 16-bit shorthand against the Bluetooth base UUID.
    #[must_use]
    pub const fn from_u16(short: u16) -> Self {
        Self(BLUETOOTH_BASE_UUID | ((short as u128) << 96))
    }

    /// Returns the raw 128-bit UUID value.
    #[must_use]
    pub const fn as_u128(&self) -> u128 {
        self.0
    }
}

impl fmt::Display for CharacteristicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:08X}-{:04X}-{:04X}-{:04X}-{:012X}",
            (self.0 >> 96) as u32,
            (self.0 >> 80) as u16,
            (self.0 >> 64) as u16,
            (self.0 >> 48) as u16,
            self.0 & 0xFFFF_FFFF_FFFF
        )
    }
}

// ============================================
// ChangeObserver
// ============================================

/// Receives value-change notifications for one characteristic.
///
/// # Purpose
/// Bridges the platform's asynchronous notification callback into a
/// bounded await: the adapter pushes payloads into the channel, the
/// handshake waits on the other end with a deadline.
///
/// # Example
/// ```ignore
/// let mut observer = connection.enable_notifications(RESPONSE_ID).await?;
/// connection.write(REQUEST_ID, &payload).await?;
/// let response = observer.wait_for_update(Duration::from_secs(3)).await?;
/// ```
#[derive(Debug)]
pub struct ChangeObserver {
    characteristic: CharacteristicId,
    receiver: mpsc::Receiver<Vec<u8>>,
}

impl ChangeObserver {
    /// Creates an observer fed by the given notification channel.
    #[must_use]
    pub const fn new(characteristic: CharacteristicId, receiver: mpsc::Receiver<Vec<u8>>) -> Self {
        Self {
            characteristic,
            receiver,
        }
    }

    /// Returns the characteristic this observer watches.
    #[must_use]
    pub const fn characteristic(&self) -> CharacteristicId {
        self.characteristic
    }

    /// Waits for the next notification payload, bounded by `deadline`.
    ///
    /// Payloads that arrived before this call are returned first, in
    /// arrival order.
    ///
    /// # Errors
    /// - [`GattError::OperationTimeout`] if no payload arrives in time
    /// - [`GattError::NotificationsClosed`] if the adapter dropped its
    ///   sending side
    pub async fn wait_for_update(&mut self, deadline: Duration) -> Result<Vec<u8>> {
        match timeout(deadline, self.receiver.recv()).await {
            Ok(Some(payload)) => Ok(payload),
            Ok(None) => Err(GattError::NotificationsClosed),
            Err(_) => Err(GattError::timeout(
                "notification wait",
                u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
            )),
        }
    }
}

// ============================================
// GattConnection Trait
// ============================================

/// Abstract interface to one connected GATT peer.
///
/// # Purpose
/// The minimal surface the handshake needs: subscribe to a response
/// characteristic, write a request payload, and know which address
/// the link was opened against. Connection lifecycle (connect,
/// disconnect, MTU) stays with the owner.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks.
#[async_trait]
pub trait GattConnection: Send + Sync {
    /// Subscribes to value-change notifications on a characteristic.
    ///
    /// # Arguments
    /// * `characteristic` - Which characteristic to observe
    ///
    /// # Returns
    /// An observer delivering notification payloads in arrival order.
    ///
    /// # Errors
    /// Returns an error if the characteristic is missing or the
    /// subscription write is rejected.
    async fn enable_notifications(
        &self,
        characteristic: CharacteristicId,
    ) -> Result<ChangeObserver>;

    /// Writes a payload to a characteristic.
    ///
    /// # Arguments
    /// * `characteristic` - Which characteristic to write
    /// * `payload` - Bytes to write
    ///
    /// # Errors
    /// Returns an error if the peer's stack rejects the write or the
    /// link is gone.
    async fn write(&self, characteristic: CharacteristicId, payload: &[u8]) -> Result<()>;

    /// Returns the address this connection was opened against.
    fn peer_address(&self) -> BluetoothAddress;
}

// ============================================
// Tests
// ============================================
