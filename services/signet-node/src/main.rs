//! Signet node: wires configuration, logging and the signing engine.
//!
//! The transport layer in front of the engine is mounted separately; until
//! then the node parses its config, brings the engine up and reports basic
//! liveness telemetry.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use serde::Serialize;

use signet_core::{logging, Config};
use signet_crypto::KeyPairGenerator;
use signet_domain::{DeviceService, SignatureService};
use signet_store::MemoryStore;

const NODE_PROTOCOL_VERSION: u32 = 1;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct NodeVersionHandshake {
    version: &'static str,
    protocol_version: u32,
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|arg| arg == "--version-json") {
        let handshake = NodeVersionHandshake {
            version: env!("CARGO_PKG_VERSION"),
            protocol_version: NODE_PROTOCOL_VERSION,
        };
        println!("{}", serde_json::to_string(&handshake)?);
        return Ok(());
    }

    let config = match parse_config_path(&args)? {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default_config(),
    };

    logging::init(&config.log);

    let store = Arc::new(MemoryStore::new());
    let generator = KeyPairGenerator::with_rsa_bits(config.keys.rsa_bits);
    let device_service = Arc::new(DeviceService::new(store.clone(), generator));
    let signature_service = SignatureService::new(device_service.clone(), store);

    tracing::info!(
        listen_addr = %config.service.listen_addr,
        listen_port = config.service.listen_port,
        rsa_bits = config.keys.rsa_bits,
        "signing engine ready"
    );

    // TODO: mount the HTTP transport in front of the engine.
    loop {
        thread::sleep(HEARTBEAT_INTERVAL);

        let devices = device_service.devices().context("reading device snapshot")?;
        let chain_entries: usize = devices
            .iter()
            .filter_map(|device| signature_service.signatures(device.id).ok())
            .map(|entries| entries.len())
            .sum();

        tracing::debug!(
            devices = devices.len(),
            chain_entries,
            "heartbeat"
        );
    }
}

fn parse_config_path(args: &[String]) -> anyhow::Result<Option<PathBuf>> {
    let mut args_iter = args.iter();
    while let Some(arg) = args_iter.next() {
        if arg == "--config" {
            return match args_iter.next() {
                Some(path) => Ok(Some(PathBuf::from(path))),
                None => Err(anyhow::anyhow!("--config was provided without a path")),
            };
        }
    }
    Ok(None)
}
