//! Shared infrastructure for the Signet signing service.
//!
//! This crate carries the concerns every other workspace member leans on:
//! process configuration and structured logging. Domain logic lives in
//! `signet-domain`, key material handling in `signet-crypto`.

pub mod config;
pub mod logging;

pub use config::{Config, KeyConfig, LogConfig, ServiceConfig};
