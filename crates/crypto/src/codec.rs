//! Serialization of key pairs for the persistence boundary.
//!
//! Only the private component is stored (PKCS#8 DER); the public component
//! is re-derived on load. Dispatch is always by [`Algorithm`] tag — the codec
//! never inspects the stored bytes to guess what they are.

use std::fmt;

use rsa::pkcs8::{DecodePrivateKey, EncodePrivateKey, EncodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::keys::{Algorithm, KeyPair};

/// DER-encoded key pair as handed to the store.
///
/// The private half is wrapped in [`Zeroizing`] so the buffer is wiped when
/// the record holding it is dropped.
#[derive(Clone)]
pub struct EncodedKeyPair {
    pub public_der: Vec<u8>,
    pub private_der: Zeroizing<Vec<u8>>,
}

impl fmt::Debug for EncodedKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedKeyPair")
            .field("public_der_len", &self.public_der.len())
            .field("private_der_len", &self.private_der.len())
            .finish()
    }
}

/// Errors that can occur while (de)serializing key material.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode {algorithm} key material: {reason}")]
    Encode { algorithm: Algorithm, reason: String },

    #[error("failed to decode {algorithm} key material: {reason}")]
    Decode { algorithm: Algorithm, reason: String },
}

/// Marshals key pairs to DER and back, keyed by algorithm tag.
#[derive(Debug, Clone, Default)]
pub struct KeyPairCodec;

impl KeyPairCodec {
    pub fn new() -> Self {
        Self
    }

    /// Serialize both halves of a key pair.
    pub fn marshal(&self, pair: &KeyPair) -> Result<EncodedKeyPair, CodecError> {
        let algorithm = pair.algorithm();
        let encode_err = |e: &dyn fmt::Display| CodecError::Encode {
            algorithm,
            reason: e.to_string(),
        };

        match pair {
            KeyPair::Rsa { public, private } => Ok(EncodedKeyPair {
                public_der: public
                    .to_public_key_der()
                    .map_err(|e| encode_err(&e))?
                    .into_vec(),
                private_der: Zeroizing::new(
                    private
                        .to_pkcs8_der()
                        .map_err(|e| encode_err(&e))?
                        .as_bytes()
                        .to_vec(),
                ),
            }),
            KeyPair::Ecc { public, private } => Ok(EncodedKeyPair {
                public_der: public
                    .to_public_key_der()
                    .map_err(|e| encode_err(&e))?
                    .into_vec(),
                private_der: Zeroizing::new(
                    private
                        .to_pkcs8_der()
                        .map_err(|e| encode_err(&e))?
                        .as_bytes()
                        .to_vec(),
                ),
            }),
        }
    }

    /// Rebuild a key pair from stored private material.
    pub fn unmarshal(&self, algorithm: Algorithm, private_der: &[u8]) -> Result<KeyPair, CodecError> {
        let decode_err = |e: &dyn fmt::Display| CodecError::Decode {
            algorithm,
            reason: e.to_string(),
        };

        match algorithm {
            Algorithm::Rsa => {
                let private =
                    RsaPrivateKey::from_pkcs8_der(private_der).map_err(|e| decode_err(&e))?;
                let public = RsaPublicKey::from(&private);
                Ok(KeyPair::Rsa { public, private })
            }
            Algorithm::Ecc => {
                let private =
                    p256::SecretKey::from_pkcs8_der(private_der).map_err(|e| decode_err(&e))?;
                let public = private.public_key();
                Ok(KeyPair::Ecc { public, private })
            }
        }
    }

    /// Stable fingerprint of the public key, for log correlation.
    ///
    /// First 16 bytes of SHA-256 over the SPKI DER, hex-encoded. Never used
    /// for dispatch or verification.
    pub fn key_id(&self, pair: &KeyPair) -> Result<String, CodecError> {
        let public_der = match pair {
            KeyPair::Rsa { public, .. } => public
                .to_public_key_der()
                .map_err(|e| CodecError::Encode {
                    algorithm: Algorithm::Rsa,
                    reason: e.to_string(),
                })?
                .into_vec(),
            KeyPair::Ecc { public, .. } => public
                .to_public_key_der()
                .map_err(|e| CodecError::Encode {
                    algorithm: Algorithm::Ecc,
                    reason: e.to_string(),
                })?
                .into_vec(),
        };

        let digest = Sha256::digest(&public_der);
        Ok(hex::encode(&digest[..16]))
    }
}
