//! Configuration management for Signet.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub keys: KeyConfig,
    pub log: LogConfig,
}

/// Listener settings consumed by the transport layer in front of the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub listen_addr: String,
    pub listen_port: u16,
}

/// Strength parameters applied when generating device key material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyConfig {
    pub rsa_bits: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Emit JSON log lines instead of human-readable ones.
    pub json: bool,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            service: ServiceConfig {
                listen_addr: "0.0.0.0".to_string(),
                listen_port: 8080,
            },
            keys: KeyConfig { rsa_bits: 2048 },
            log: LogConfig { json: false },
        }
    }
}
