//! Storage contracts consumed by the domain services.
//!
//! The engine keeps all state in process memory, but the services only ever
//! talk to these traits so the backend stays swappable. Mutating a device's
//! chain state is legal only inside [`SignatureStore::run_exclusive`] for
//! that device.

use thiserror::Error;
use uuid::Uuid;

use crate::device::Device;
use crate::signature::SignedData;
use signet_crypto::CodecError;

/// Errors surfaced by the persistence boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("device not found: {device_id}")]
    DeviceNotFound { device_id: Uuid },

    #[error("device already exists: {device_id}")]
    DeviceExists { device_id: Uuid },

    #[error("signature log for device {device_id} is empty")]
    EmptyLog { device_id: Uuid },

    #[error("key material codec failure for device {device_id}")]
    Codec {
        device_id: Uuid,
        #[source]
        source: CodecError,
    },
}

/// Durable-in-process record of devices and their counters.
pub trait DeviceStore: Send + Sync {
    /// Store a new device, persisting its private key material.
    fn create_device(&self, device: &Device) -> Result<(), StoreError>;

    /// Load a device, reconstructing its key pair from stored bytes.
    fn get_device(&self, device_id: Uuid) -> Result<Device, StoreError>;

    /// Unordered snapshot of all devices.
    fn devices(&self) -> Result<Vec<Device>, StoreError>;

    /// Advance the device's signature counter by exactly 1.
    ///
    /// Must only be called from within the device's exclusive section.
    fn increment_counter(&self, device_id: Uuid) -> Result<(), StoreError>;
}

/// Append-only, per-device signature log.
pub trait SignatureStore: Send + Sync {
    /// Run `work` inside the device's exclusive section.
    ///
    /// Entry fails with [`StoreError::DeviceNotFound`] for an unknown device;
    /// the closure result is returned unchanged. The section is released on
    /// every exit path, including panics inside `work`.
    fn run_exclusive<T, E, F>(&self, device_id: Uuid, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<StoreError>;

    fn append_signature(&self, device_id: Uuid, data: SignedData) -> Result<(), StoreError>;

    /// Most recently appended entry, in insertion order. `Ok(None)` when the
    /// device exists but has not signed yet.
    fn last_signature(&self, device_id: Uuid) -> Result<Option<SignedData>, StoreError>;

    /// All entries for the device, oldest first.
    fn signatures(&self, device_id: Uuid) -> Result<Vec<SignedData>, StoreError>;
}
