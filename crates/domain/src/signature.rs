//! The chain-linking signature protocol.
//!
//! Every signature a device produces embeds its predecessor, forming a
//! tamper-evident chain per device:
//!
//! - entry `i >= 1` signs a payload ending in the signature of entry `i - 1`
//! - entry `0` signs a payload ending in the base64 encoding of the device id
//!
//! The signed payload is `{counter}_{data}_{link}`. The counter is decimal
//! and the link is standard-alphabet base64, so neither can contain the
//! separator; the three fields are recoverable by splitting at the first and
//! last `_` even when caller data contains one.

use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::device::{DeviceError, DeviceService};
use crate::store::{DeviceStore, SignatureStore, StoreError};
use signet_crypto::{SignError, SignerFactory, TransactionSigner as _};

/// One entry of a device's signature chain. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SignedData {
    /// Base64-encoded signature bytes.
    pub signature: String,
    /// The exact payload that was signed, chain link included.
    pub original_data: String,
}

/// Errors surfaced by signing operations.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("signing transaction for device {device_id} failed")]
    Sign {
        device_id: Uuid,
        #[source]
        source: SignError,
    },

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Chain link for a device that has not signed anything yet.
fn genesis_link(device_id: Uuid) -> String {
    general_purpose::STANDARD.encode(device_id.to_string())
}

/// Payload put in front of the signing primitive.
fn chain_payload(counter: u64, data: &str, link: &str) -> String {
    format!("{counter}_{data}_{link}")
}

/// Orchestrates chained signing over the store and the signer factory.
pub struct SignatureService<S> {
    devices: Arc<DeviceService<S>>,
    store: Arc<S>,
    factory: SignerFactory,
}

impl<S: DeviceStore + SignatureStore> SignatureService<S> {
    pub fn new(devices: Arc<DeviceService<S>>, store: Arc<S>) -> Self {
        Self {
            devices,
            store,
            factory: SignerFactory::new(),
        }
    }

    /// Sign `data` for the device, linking the new signature to the chain.
    ///
    /// Runs as one exclusive unit per device: chain-state read, signing,
    /// append and counter increment cannot interleave with another call for
    /// the same device. Every fallible step precedes the first mutation, so
    /// a failure leaves counter and log untouched.
    pub fn sign_transaction(
        &self,
        device_id: Uuid,
        data: &str,
    ) -> Result<SignedData, SignatureError> {
        self.store.run_exclusive(device_id, || {
            let device = self.devices.get_device(device_id)?;

            let link = if device.signature_counter == 0 {
                genesis_link(device.id)
            } else {
                self.store
                    .last_signature(device_id)?
                    .ok_or(StoreError::EmptyLog { device_id })?
                    .signature
            };

            let payload = chain_payload(device.signature_counter, data, &link);

            let signer = self.factory.create_signer(&device.key_pair);
            let raw = signer
                .sign(payload.as_bytes())
                .map_err(|source| SignatureError::Sign { device_id, source })?;

            let signed = SignedData {
                signature: general_purpose::STANDARD.encode(raw),
                original_data: payload,
            };

            self.store.append_signature(device_id, signed.clone())?;
            self.store.increment_counter(device_id)?;

            debug!(
                device_id = %device_id,
                counter = device.signature_counter + 1,
                "transaction signed"
            );

            Ok(signed)
        })
    }

    /// All signatures the device has produced, in chain order.
    pub fn signatures(&self, device_id: Uuid) -> Result<Vec<SignedData>, SignatureError> {
        Ok(self.store.signatures(device_id)?)
    }
}
