//! In-memory realization of the storage contracts.
//!
//! One map entry per device. Each entry carries its own transaction lock
//! (the device's exclusive section) and a record lock for state access, so
//! operations on different devices never contend with each other. The
//! map-level lock is held only for lookup and insert, never across a signing
//! operation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;
use zeroize::Zeroizing;

use signet_crypto::{Algorithm, KeyPairCodec};
use signet_domain::store::{DeviceStore, SignatureStore, StoreError};
use signet_domain::{Device, SignedData};

/// Stored form of a device: key material as DER, chain state inline.
struct DeviceRecord {
    id: Uuid,
    label: Option<String>,
    algorithm: Algorithm,
    signature_counter: u64,
    key_id: String,
    private_der: Zeroizing<Vec<u8>>,
    signatures: Vec<SignedData>,
}

struct DeviceEntry {
    /// Held for the duration of one `run_exclusive` call.
    tx_lock: Mutex<()>,
    record: RwLock<DeviceRecord>,
}

impl DeviceEntry {
    // Record updates are single assignments or pushes and never unwind
    // mid-update, so a poisoned lock still guards a consistent record.
    fn read(&self) -> RwLockReadGuard<'_, DeviceRecord> {
        self.record.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DeviceRecord> {
        self.record.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_tx(&self) -> MutexGuard<'_, ()> {
        self.tx_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Concurrent map of devices, keyed by id, each entry independently lockable.
pub struct MemoryStore {
    codec: KeyPairCodec,
    devices: RwLock<HashMap<Uuid, Arc<DeviceEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            codec: KeyPairCodec::new(),
            devices: RwLock::new(HashMap::new()),
        }
    }

    fn entry(&self, device_id: Uuid) -> Result<Arc<DeviceEntry>, StoreError> {
        self.devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&device_id)
            .cloned()
            .ok_or(StoreError::DeviceNotFound { device_id })
    }

    fn device_from_record(&self, record: &DeviceRecord) -> Result<Device, StoreError> {
        let key_pair = self
            .codec
            .unmarshal(record.algorithm, &record.private_der)
            .map_err(|source| StoreError::Codec {
                device_id: record.id,
                source,
            })?;

        Ok(Device {
            id: record.id,
            label: record.label.clone(),
            algorithm: record.algorithm,
            signature_counter: record.signature_counter,
            key_id: record.key_id.clone(),
            key_pair,
        })
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceStore for MemoryStore {
    fn create_device(&self, device: &Device) -> Result<(), StoreError> {
        // Marshal before taking the map lock; a codec failure must leave no
        // partial record behind.
        let encoded = self
            .codec
            .marshal(&device.key_pair)
            .map_err(|source| StoreError::Codec {
                device_id: device.id,
                source,
            })?;

        let mut devices = self.devices.write().unwrap_or_else(PoisonError::into_inner);
        if devices.contains_key(&device.id) {
            return Err(StoreError::DeviceExists {
                device_id: device.id,
            });
        }

        devices.insert(
            device.id,
            Arc::new(DeviceEntry {
                tx_lock: Mutex::new(()),
                record: RwLock::new(DeviceRecord {
                    id: device.id,
                    label: device.label.clone(),
                    algorithm: device.algorithm,
                    signature_counter: device.signature_counter,
                    key_id: device.key_id.clone(),
                    private_der: encoded.private_der,
                    signatures: Vec::new(),
                }),
            }),
        );

        Ok(())
    }

    fn get_device(&self, device_id: Uuid) -> Result<Device, StoreError> {
        let entry = self.entry(device_id)?;
        let record = entry.read();
        self.device_from_record(&record)
    }

    fn devices(&self) -> Result<Vec<Device>, StoreError> {
        let entries: Vec<Arc<DeviceEntry>> = self
            .devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        entries
            .iter()
            .map(|entry| self.device_from_record(&entry.read()))
            .collect()
    }

    fn increment_counter(&self, device_id: Uuid) -> Result<(), StoreError> {
        let entry = self.entry(device_id)?;
        entry.write().signature_counter += 1;
        Ok(())
    }
}

impl SignatureStore for MemoryStore {
    fn run_exclusive<T, E, F>(&self, device_id: Uuid, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<StoreError>,
    {
        let entry = self.entry(device_id).map_err(E::from)?;
        let _guard = entry.lock_tx();
        work()
    }

    fn append_signature(&self, device_id: Uuid, data: SignedData) -> Result<(), StoreError> {
        let entry = self.entry(device_id)?;
        entry.write().signatures.push(data);
        Ok(())
    }

    fn last_signature(&self, device_id: Uuid) -> Result<Option<SignedData>, StoreError> {
        let entry = self.entry(device_id)?;
        // Tail of the append-ordered log. Never selected by timestamp.
        let record = entry.read();
        Ok(record.signatures.last().cloned())
    }

    fn signatures(&self, device_id: Uuid) -> Result<Vec<SignedData>, StoreError> {
        let entry = self.entry(device_id)?;
        let record = entry.read();
        Ok(record.signatures.clone())
    }
}
