//! Concurrency properties of the per-device exclusive section.
//!
//! The primary failure mode these tests stress: two concurrent signers
//! reading the same "last signature", producing two entries that claim the
//! same predecessor. A correct exclusive section makes that impossible.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use signet_crypto::Algorithm;

use crate::test_utils::{assert_chain_valid, build_engine, create_device};

#[test]
fn test_per_device_isolation_under_contention() {
    let engine = Arc::new(build_engine());
    let device = create_device(&engine, Algorithm::Ecc);

    const THREADS: usize = 8;
    const SIGNS_PER_THREAD: usize = 5;

    thread::scope(|scope| {
        for t in 0..THREADS {
            let engine = engine.clone();
            let device_id = device.id;
            scope.spawn(move || {
                for i in 0..SIGNS_PER_THREAD {
                    engine
                        .signatures
                        .sign_transaction(device_id, &format!("t{t}-{i}"))
                        .unwrap();
                }
            });
        }
    });

    let total = (THREADS * SIGNS_PER_THREAD) as u64;
    let loaded = engine.devices.get_device(device.id).unwrap();
    assert_eq!(loaded.signature_counter, total);
    assert_eq!(
        engine.signatures.signatures(device.id).unwrap().len(),
        total as usize
    );
    assert_chain_valid(&engine, device.id);
}

#[test]
fn test_no_two_entries_share_a_predecessor() {
    let engine = Arc::new(build_engine());
    let device = create_device(&engine, Algorithm::Ecc);

    const THREADS: usize = 16;

    thread::scope(|scope| {
        for t in 0..THREADS {
            let engine = engine.clone();
            let device_id = device.id;
            scope.spawn(move || {
                engine
                    .signatures
                    .sign_transaction(device_id, &format!("claim-{t}"))
                    .unwrap();
            });
        }
    });

    let entries = engine.signatures.signatures(device.id).unwrap();
    assert_eq!(entries.len(), THREADS);

    // Every entry embeds a distinct predecessor link and a distinct position.
    let links: HashSet<&str> = entries
        .iter()
        .map(|entry| entry.original_data.rsplit_once('_').unwrap().1)
        .collect();
    assert_eq!(links.len(), THREADS);

    let positions: HashSet<u64> = entries
        .iter()
        .map(|entry| {
            entry
                .original_data
                .split_once('_')
                .unwrap()
                .0
                .parse()
                .unwrap()
        })
        .collect();
    assert_eq!(positions, (0..THREADS as u64).collect());

    assert_chain_valid(&engine, device.id);
}

#[test]
fn test_distinct_devices_make_progress_concurrently() {
    let engine = Arc::new(build_engine());

    const DEVICES: usize = 4;
    const SIGNS_PER_DEVICE: usize = 10;

    let devices: Vec<_> = (0..DEVICES)
        .map(|_| create_device(&engine, Algorithm::Ecc))
        .collect();

    thread::scope(|scope| {
        for device in &devices {
            let engine = engine.clone();
            let device_id = device.id;
            scope.spawn(move || {
                for i in 0..SIGNS_PER_DEVICE {
                    engine
                        .signatures
                        .sign_transaction(device_id, &format!("{i}"))
                        .unwrap();
                }
            });
        }
    });

    for device in &devices {
        let loaded = engine.devices.get_device(device.id).unwrap();
        assert_eq!(loaded.signature_counter as usize, SIGNS_PER_DEVICE);
        assert_chain_valid(&engine, device.id);
    }
}

#[test]
fn test_reads_are_safe_during_concurrent_signing() {
    let engine = Arc::new(build_engine());
    let device = create_device(&engine, Algorithm::Ecc);

    const SIGNS: usize = 20;

    thread::scope(|scope| {
        let writer = engine.clone();
        let device_id = device.id;
        scope.spawn(move || {
            for i in 0..SIGNS {
                writer
                    .signatures
                    .sign_transaction(device_id, &format!("{i}"))
                    .unwrap();
            }
        });

        let reader = engine.clone();
        scope.spawn(move || {
            for _ in 0..SIGNS {
                // Each individual read must observe a well-formed record.
                let loaded = reader.devices.get_device(device_id).unwrap();
                assert!(loaded.signature_counter <= SIGNS as u64);
                let entries = reader.signatures.signatures(device_id).unwrap();
                assert!(entries.len() <= SIGNS);
            }
        });
    });

    assert_chain_valid(&engine, device.id);
}
