// ============================================
// File: crates/bluepair-gatt/src/mock.rs
// ============================================
//! # Mock GATT Connection Implementation
//!
//! ## Creation Reason
//! Provides a scriptable in-memory connection for testing handshake
//! logic without a Bluetooth stack or radio hardware.
//!
//! ## Main Functionality
//! - Captures written payloads for verification
//! - Scripted per-write failures (status codes, timeouts)
//! - Notification injection, before or after subscription
//! - A provider task can await writes via [`MockConnection::next_write`]
//!
//! ## Usage in Tests
//! ```
//! use bluepair_common::BluetoothAddress;
//! use bluepair_gatt::mock::MockConnection;
//! use bluepair_gatt::traits::{CharacteristicId, GattConnection};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let peer = BluetoothAddress::new([0xBB, 0xBB, 0xBB, 0xBB, 0xBB, 0x1E]);
//! let connection = MockConnection::new(peer);
//! let characteristic = CharacteristicId::from_u16(0x2A00);
//!
//! connection.write(characteristic, b"ping").await.unwrap();
//! let written = connection.take_written();
//! assert_eq!(written[0].1, b"ping");
//! # }
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - This is for testing only - do not use in production
//! - `next_write` and `take_written` drain the same capture queue;
//!   use one or the other within a single test
//!
//! ## Last Modified
//! v0.1.0 - Initial mock implementation

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{mpsc, Notify};

use bluepair_common::BluetoothAddress;

use crate::error::{GattError, Result};
use crate::traits::{ChangeObserver, CharacteristicId, GattConnection};

// ============================================
// Constants
// ============================================

/// Capacity of each subscriber's notification channel.
const NOTIFY_CHANNEL_SIZE: usize = 32;

// ============================================
// MockConnection
// ============================================

/// Scriptable GATT connection for testing.
///
/// # Features
/// - In-memory write capture
/// - Queued write failures popped one per call
/// - Notification delivery into live observers, with buffering for
///   payloads queued before any subscription exists
///
/// # Example
/// ```
/// use bluepair_common::BluetoothAddress;
/// use bluepair_gatt::error::GattError;
/// use bluepair_gatt::mock::MockConnection;
/// use bluepair_gatt::traits::{CharacteristicId, GattConnection};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let connection = MockConnection::new(BluetoothAddress::new([0; 6]));
/// let characteristic = CharacteristicId::from_u16(0x2A00);
///
/// connection.script_write_error(GattError::status("write", 133));
/// assert!(connection.write(characteristic, b"x").await.is_err());
/// assert!(connection.write(characteristic, b"x").await.is_ok());
/// # }
/// ```
pub struct MockConnection {
    /// Address the connection pretends to be opened against
    peer_address: Mutex<BluetoothAddress>,
    /// Captured writes, in call order
    writes: Mutex<VecDeque<(CharacteristicId, Vec<u8>)>>,
    /// Errors to return from upcoming `write` calls
    write_errors: Mutex<VecDeque<GattError>>,
    /// Live notification subscribers
    subscribers: Mutex<Vec<(CharacteristicId, mpsc::Sender<Vec<u8>>)>>,
    /// Payloads queued before a matching subscriber existed
    queued_notifications: Mutex<VecDeque<(CharacteristicId, Vec<u8>)>>,
    /// When set, `enable_notifications` reports the characteristic missing
    characteristic_missing: AtomicBool,
    /// Signaled on every captured write
    write_notify: Notify,
}

impl MockConnection {
    /// Creates a new mock connection to the given peer address.
    #[must_use]
    pub fn new(peer_address: BluetoothAddress) -> Self {
        Self {
            peer_address: Mutex::new(peer_address),
            writes: Mutex::new(VecDeque::with_capacity(8)),
            write_errors: Mutex::new(VecDeque::new()),
            subscribers: Mutex::new(Vec::new()),
            queued_notifications: Mutex::new(VecDeque::new()),
            characteristic_missing: AtomicBool::new(false),
            write_notify: Notify::new(),
        }
    }

    // ========================================
    // Scripting
    // ========================================

    /// Queues an error for an upcoming `write` call.
    ///
    /// Errors are popped one per call, oldest first; once the queue is
    /// empty, writes succeed again.
    pub fn script_write_error(&self, error: GattError) {
        self.write_errors.lock().push_back(error);
    }

    /// Makes `enable_notifications` report the characteristic missing.
    pub fn set_characteristic_missing(&self, missing: bool) {
        self.characteristic_missing.store(missing, Ordering::Release);
    }

    /// Changes the address reported by `peer_address`.
    pub fn set_peer_address(&self, address: BluetoothAddress) {
        *self.peer_address.lock() = address;
    }

    /// Delivers a notification payload for a characteristic.
    ///
    /// Live subscribers receive it immediately; with no subscriber it
    /// is buffered and drained into the next matching subscription.
    pub fn notify(&self, characteristic: CharacteristicId, payload: Vec<u8>) {
        let subscribers = self.subscribers.lock();
        let mut delivered = false;
        for (subscribed, sender) in subscribers.iter() {
            if *subscribed == characteristic && sender.try_send(payload.clone()).is_ok() {
                delivered = true;
            }
        }
        drop(subscribers);

        if !delivered {
            self.queued_notifications
                .lock()
                .push_back((characteristic, payload));
        }
    }

    /// Drops all subscriber channels, closing their observers.
    pub fn close_notifications(&self) {
        self.subscribers.lock().clear();
    }

    // ========================================
    // Inspection
    // ========================================

    /// Waits for the next captured write and removes it.
    pub async fn next_write(&self) -> (CharacteristicId, Vec<u8>) {
        loop {
            {
                let mut writes = self.writes.lock();
                if let Some(entry) = writes.pop_front() {
                    return entry;
                }
            }

            self.write_notify.notified().await;
        }
    }

    /// Takes all captured writes, clearing the queue.
    #[must_use]
    pub fn take_written(&self) -> Vec<(CharacteristicId, Vec<u8>)> {
        self.writes.lock().drain(..).collect()
    }

    /// Returns the number of captured writes.
    #[must_use]
    pub fn written_count(&self) -> usize {
        self.writes.lock().len()
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

#[async_trait]
impl GattConnection for MockConnection {
    async fn enable_notifications(
        &self,
        characteristic: CharacteristicId,
    ) -> Result<ChangeObserver> {
        if self.characteristic_missing.load(Ordering::Acquire) {
            return Err(GattError::CharacteristicNotFound { characteristic });
        }

        let (sender, receiver) = mpsc::channel(NOTIFY_CHANNEL_SIZE);

        // Hand over anything queued before this subscription.
        let mut queued = self.queued_notifications.lock();
        let mut remaining = VecDeque::with_capacity(queued.len());
        for (target, payload) in queued.drain(..) {
            if target == characteristic {
                if sender.try_send(payload).is_err() {
                    break;
                }
            } else {
                remaining.push_back((target, payload));
            }
        }
        *queued = remaining;
        drop(queued);

        self.subscribers.lock().push((characteristic, sender));
        Ok(ChangeObserver::new(characteristic, receiver))
    }

    async fn write(&self, characteristic: CharacteristicId, payload: &[u8]) -> Result<()> {
        if let Some(error) = self.write_errors.lock().pop_front() {
            return Err(error);
        }

        self.writes
            .lock()
            .push_back((characteristic, payload.to_vec()));
        self.write_notify.notify_one();
        Ok(())
    }

    fn peer_address(&self) -> BluetoothAddress {
        *self.peer_address.lock()
    }
}

impl std::fmt::Debug for MockConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockConnection")
            .field("peer_address", &self.peer_address())
            .field("captured_writes", &self.written_count())
            .field("subscriptions", &self.subscription_count())
            .finish()
    }
}

// ============================================
// Tests
// ============================================
