//! Shared helpers for engine integration tests.

use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use uuid::Uuid;

use signet_crypto::{Algorithm, KeyPairGenerator};
use signet_domain::{Device, DeviceService, SignatureService};
use signet_store::MemoryStore;

pub struct TestEngine {
    pub devices: Arc<DeviceService<MemoryStore>>,
    pub signatures: SignatureService<MemoryStore>,
}

/// Build a full engine on a fresh in-memory store.
///
/// RSA keys use a small modulus so tests stay fast; strength is a
/// configuration concern, not a protocol one.
pub fn build_engine() -> TestEngine {
    let store = Arc::new(MemoryStore::new());
    let devices = Arc::new(DeviceService::new(
        store.clone(),
        KeyPairGenerator::with_rsa_bits(512),
    ));
    let signatures = SignatureService::new(devices.clone(), store);
    TestEngine {
        devices,
        signatures,
    }
}

pub fn create_device(engine: &TestEngine, algorithm: Algorithm) -> Device {
    engine
        .devices
        .create_device(Some("integration".to_string()), algorithm)
        .unwrap()
}

/// Expected chain link for a device that has not signed yet.
pub fn expected_genesis_link(device_id: Uuid) -> String {
    general_purpose::STANDARD.encode(device_id.to_string())
}

/// Assert the full chain-linkage property over a device's log:
/// entry `i` starts with `i_`, ends with the previous entry's signature
/// (or the genesis link at position 0), and the counter equals the length.
pub fn assert_chain_valid(engine: &TestEngine, device_id: Uuid) {
    let entries = engine.signatures.signatures(device_id).unwrap();
    let device = engine.devices.get_device(device_id).unwrap();
    assert_eq!(
        device.signature_counter as usize,
        entries.len(),
        "counter and log length disagree for device {device_id}"
    );

    let mut link = expected_genesis_link(device_id);
    for (i, entry) in entries.iter().enumerate() {
        assert!(
            entry.original_data.starts_with(&format!("{i}_")),
            "entry {i} does not carry its position: {}",
            entry.original_data
        );
        assert!(
            entry.original_data.ends_with(&format!("_{link}")),
            "entry {i} does not link its predecessor"
        );
        link = entry.signature.clone();
    }
}
