//! Signing devices and their lifecycle.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::store::{DeviceStore, StoreError};
use signet_crypto::{Algorithm, CodecError, GenerationError, KeyPair, KeyPairCodec, KeyPairGenerator};

/// A logical signing identity.
///
/// The counter and the signature log belong to the device and are only
/// mutated through the store, inside the device's exclusive section.
#[derive(Debug, Clone)]
pub struct Device {
    pub id: Uuid,
    pub label: Option<String>,
    pub algorithm: Algorithm,
    /// Monotonic count of signatures produced; equals the chain length.
    pub signature_counter: u64,
    /// Public key fingerprint, used in log events.
    pub key_id: String,
    pub key_pair: KeyPair,
}

/// Errors surfaced by device lifecycle operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("creating device: {algorithm} key generation failed")]
    Generation {
        algorithm: Algorithm,
        #[source]
        source: GenerationError,
    },

    #[error("creating device {device_id}: key fingerprint failed")]
    Fingerprint {
        device_id: Uuid,
        #[source]
        source: CodecError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates device creation and lookup.
pub struct DeviceService<S> {
    store: Arc<S>,
    generator: KeyPairGenerator,
    codec: KeyPairCodec,
}

impl<S: DeviceStore> DeviceService<S> {
    pub fn new(store: Arc<S>, generator: KeyPairGenerator) -> Self {
        Self {
            store,
            generator,
            codec: KeyPairCodec::new(),
        }
    }

    /// Generate a key pair and register a new device with counter 0.
    ///
    /// A failed creation leaves no partial record behind: the store is only
    /// touched once the key material exists and marshals cleanly.
    pub fn create_device(
        &self,
        label: Option<String>,
        algorithm: Algorithm,
    ) -> Result<Device, DeviceError> {
        let key_pair = self
            .generator
            .generate(algorithm)
            .map_err(|source| DeviceError::Generation { algorithm, source })?;

        let id = Uuid::new_v4();
        let key_id = self
            .codec
            .key_id(&key_pair)
            .map_err(|source| DeviceError::Fingerprint {
                device_id: id,
                source,
            })?;

        let device = Device {
            id,
            label,
            algorithm,
            signature_counter: 0,
            key_id,
            key_pair,
        };

        self.store.create_device(&device)?;

        info!(
            device_id = %device.id,
            algorithm = %device.algorithm,
            key_id = %device.key_id,
            label = device.label.as_deref().unwrap_or(""),
            "device created"
        );

        Ok(device)
    }

    pub fn get_device(&self, device_id: Uuid) -> Result<Device, DeviceError> {
        Ok(self.store.get_device(device_id)?)
    }

    pub fn devices(&self) -> Result<Vec<Device>, DeviceError> {
        Ok(self.store.devices()?)
    }
}
