// ============================================
// File: crates/bluepair-seeker/src/provider.rs
// ============================================
//! # Scripted Provider
//!
//! ## Creation Reason
//! Demos and integration tests need a provider on the far side of a
//! [`MockConnection`] that actually speaks the handshake: decrypt the
//! written block, validate it, notify a sealed response back.
//!
//! ## Main Functionality
//! - `ScriptedProvider::respond_once`: answer a single handshake write
//! - `ScriptedProvider::serve`: answer a fixed number of rounds
//!
//! ## ⚠️ Important Note for Next Developer
//! - Requests carrying public key material are accepted as-is; the
//!   provider here is provisioned with the shared key up front and
//!   does not run a key agreement
//! - Responses are sealed with the same key the request was sealed
//!   with, so a wrong key on either side fails loudly in the decrypt
//!
//! ## Last Modified
//! v0.1.0 - Initial scripted provider

use std::sync::Arc;

use tracing::{debug, warn};

use bluepair_common::{AuthenticityKey, BluetoothAddress, CommonError};
use bluepair_core::crypto::block::{decrypt_block, encrypt_block};
use bluepair_core::protocol::{
    decode_action, decode_key_based_pairing, peek_message_type, HandshakeResponse, MessageType,
    MESSAGE_SIZE,
};
use bluepair_gatt::{GattConnection, MockConnection};

use crate::error::Result;
use crate::handshake::KEY_BASED_PAIRING_CHARACTERISTIC;

/// Answers handshake writes on a mock connection the way a paired
/// provider would.
pub struct ScriptedProvider {
    connection: Arc<MockConnection>,
    key: AuthenticityKey,
    public_address: BluetoothAddress,
}

impl ScriptedProvider {
    /// Creates a provider that seals with `key` and reports
    /// `public_address` in its responses.
    #[must_use]
    pub fn new(
        connection: Arc<MockConnection>,
        key: AuthenticityKey,
        public_address: BluetoothAddress,
    ) -> Self {
        Self {
            connection,
            key,
            public_address,
        }
    }

    /// Waits for the next handshake write and notifies the response.
    ///
    /// Returns the decoded request type.
    ///
    /// # Errors
    /// Fails when the write targets another characteristic, the block
    /// does not decrypt into a well-formed request, or the request
    /// names a provider address other than this one.
    pub async fn respond_once(&self) -> Result<MessageType> {
        let (characteristic, payload) = self.connection.next_write().await;
        if characteristic != KEY_BASED_PAIRING_CHARACTERISTIC {
            return Err(CommonError::invalid_input(
                "characteristic",
                "write does not target the pairing characteristic",
            )
            .into());
        }
        if payload.len() < MESSAGE_SIZE {
            return Err(CommonError::invalid_length(MESSAGE_SIZE, payload.len()).into());
        }

        let block = decrypt_block(self.key.as_bytes(), &payload[..MESSAGE_SIZE])?;
        let message_type = peek_message_type(&block)?;
        let requested_address = match message_type {
            MessageType::KeyBasedPairing => {
                let request = decode_key_based_pairing(&block)?;
                debug!(
                    flags = ?request.flags,
                    seeker = ?request.seeker_public_address,
                    "provider received pairing request"
                );
                request.provider_address
            }
            MessageType::ActionOverBle => {
                let request = decode_action(&block)?;
                debug!(
                    event_group = request.event_group,
                    event_code = request.event_code,
                    "provider received action request"
                );
                request.provider_address
            }
        };

        if requested_address != self.connection.peer_address()
            && requested_address != self.public_address
        {
            return Err(CommonError::invalid_input(
                "provider_address",
                "request names a different provider",
            )
            .into());
        }
        if payload.len() > MESSAGE_SIZE {
            debug!(
                material_len = payload.len() - MESSAGE_SIZE,
                "request carried public key material"
            );
        }

        let mut response = [0u8; MESSAGE_SIZE];
        response[0] = HandshakeResponse::KEY_BASED_PAIRING_RESPONSE;
        response[1..7].copy_from_slice(self.public_address.as_bytes());
        response[7..].copy_from_slice(&rand::random::<[u8; 9]>());

        let sealed = encrypt_block(self.key.as_bytes(), &response)?;
        self.connection
            .notify(KEY_BASED_PAIRING_CHARACTERISTIC, sealed.to_vec());
        Ok(message_type)
    }

    /// Answers `rounds` handshake writes, logging failures instead of
    /// propagating them.
    pub async fn serve(&self, rounds: u32) {
        for round in 0..rounds {
            if let Err(error) = self.respond_once().await {
                warn!(round, %error, "provider could not answer");
            }
        }
    }
}

impl std::fmt::Debug for ScriptedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedProvider")
            .field("public_address", &self.public_address)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use bluepair_core::protocol::{encode_key_based_pairing, KeyBasedPairingRequest, RequestFlags};

    use crate::events::RecordingEventSink;
    use crate::handshake::{AbortFlag, HandshakeController};
    use crate::policy::RetryPolicy;

    const PROVIDER: BluetoothAddress =
        BluetoothAddress::new([0xBB, 0xBB, 0xBB, 0xBB, 0xBB, 0x1E]);
    const PUBLIC: BluetoothAddress = BluetoothAddress::new([0x10, 0x20, 0x30, 0x40, 0x50, 0x60]);

    fn key() -> AuthenticityKey {
        AuthenticityKey::from_bytes(&[0x5A; 16]).unwrap()
    }

    fn sealed_request(key: &AuthenticityKey, provider: BluetoothAddress) -> Vec<u8> {
        let request = KeyBasedPairingRequest::new(provider, RequestFlags::REQUEST_DISCOVERABLE);
        let block = encode_key_based_pairing(&request).unwrap();
        encrypt_block(key.as_bytes(), &block).unwrap().to_vec()
    }

    #[tokio::test]
    async fn test_provider_answers_valid_request() {
        let connection = Arc::new(MockConnection::new(PROVIDER));
        let key = key();
        let provider = ScriptedProvider::new(Arc::clone(&connection), key.clone(), PUBLIC);

        let mut observer = connection
            .enable_notifications(KEY_BASED_PAIRING_CHARACTERISTIC)
            .await
            .unwrap();
        connection
            .write(
                KEY_BASED_PAIRING_CHARACTERISTIC,
                &sealed_request(&key, PROVIDER),
            )
            .await
            .unwrap();

        let answered = provider.respond_once().await.unwrap();
        assert_eq!(answered, MessageType::KeyBasedPairing);

        let raw = observer
            .wait_for_update(std::time::Duration::from_secs(1))
            .await
            .unwrap();
        let block = decrypt_block(key.as_bytes(), &raw).unwrap();
        let response = HandshakeResponse::from_bytes(&block).unwrap();
        assert!(response.is_key_based_pairing_response());
        assert_eq!(response.provider_address(), PUBLIC);
    }

    #[tokio::test]
    async fn test_provider_rejects_foreign_address() {
        let connection = Arc::new(MockConnection::new(PROVIDER));
        let key = key();
        let provider = ScriptedProvider::new(Arc::clone(&connection), key.clone(), PUBLIC);

        let other = BluetoothAddress::new([0x01; 6]);
        connection
            .write(KEY_BASED_PAIRING_CHARACTERISTIC, &sealed_request(&key, other))
            .await
            .unwrap();

        assert!(provider.respond_once().await.is_err());
    }

    #[tokio::test]
    async fn test_provider_rejects_short_payload() {
        let connection = Arc::new(MockConnection::new(PROVIDER));
        let provider = ScriptedProvider::new(Arc::clone(&connection), key(), PUBLIC);

        connection
            .write(KEY_BASED_PAIRING_CHARACTERISTIC, &[0x00; 4])
            .await
            .unwrap();

        assert!(provider.respond_once().await.is_err());
    }

    #[tokio::test]
    async fn test_full_handshake_against_provider() {
        let connection = Arc::new(MockConnection::new(PROVIDER));
        let key = key();
        let sink = Arc::new(RecordingEventSink::new());
        let controller =
            HandshakeController::new(Arc::clone(&connection), RetryPolicy::default())
                .with_event_sink(Arc::clone(&sink) as _);
        let provider = ScriptedProvider::new(Arc::clone(&connection), key.clone(), PUBLIC);

        let serving = tokio::spawn(async move { provider.respond_once().await });
        tokio::task::yield_now().await;

        let request = KeyBasedPairingRequest::new(PROVIDER, RequestFlags::REQUEST_DISCOVERABLE);
        let response = controller
            .perform_handshake(&key, &request, None, &AbortFlag::new())
            .await
            .unwrap();

        assert_eq!(response.provider_address(), PUBLIC);
        assert_eq!(sink.success_count(), 1);
        assert_eq!(serving.await.unwrap().unwrap(), MessageType::KeyBasedPairing);
    }
}
