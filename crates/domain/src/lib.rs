//! Domain services for the Signet signing engine.
//!
//! [`DeviceService`] owns device lifecycle, [`SignatureService`] owns the
//! chain-linking signing protocol. Both sit on top of the storage contracts
//! in [`store`], which an in-process backend (`signet-store`) implements.

pub mod device;
pub mod signature;
pub mod store;

pub use device::{Device, DeviceError, DeviceService};
pub use signature::{SignatureError, SignatureService, SignedData};
pub use store::{DeviceStore, SignatureStore, StoreError};
