//! Key material handling for Signet signing devices.
//!
//! Everything algorithm-specific lives behind the [`Algorithm`] tag:
//! generation ([`keys`]), serialization of private material ([`codec`]) and
//! the signing capability itself ([`signing`]). Each operation dispatches
//! with a single `match` on the tag; no runtime type inspection anywhere.

pub mod codec;
pub mod keys;
pub mod signing;

pub use codec::{CodecError, EncodedKeyPair, KeyPairCodec};
pub use keys::{Algorithm, AlgorithmParseError, GenerationError, KeyPair, KeyPairGenerator};
pub use signing::{SignError, SignerFactory, TransactionSigner};
