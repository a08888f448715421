//! Signer capabilities bound to device key pairs.
//!
//! A [`TransactionSigner`] wraps one key pair's private half and produces raw
//! signature bytes over arbitrary input. Both algorithms hash with SHA-256
//! before the private-key primitive: RSA signs PKCS#1 v1.5, ECC signs ECDSA
//! over P-256 with DER-encoded output.

use rsa::pkcs1v15;
use sha2::Sha256;
use signature::{SignatureEncoding, Signer};
use thiserror::Error;

use crate::keys::KeyPair;

/// Errors that can occur while producing a signature.
#[derive(Debug, Error)]
pub enum SignError {
    #[error("signing primitive rejected input: {reason}")]
    Primitive { reason: String },
}

/// A capability that signs byte sequences with one device's private key.
pub trait TransactionSigner: Send + Sync {
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, SignError>;
}

/// Builds the signer matching a key pair's algorithm.
#[derive(Debug, Clone, Default)]
pub struct SignerFactory;

impl SignerFactory {
    pub fn new() -> Self {
        Self
    }

    /// Create a signer for `pair`.
    ///
    /// Infallible: the key pair enum is closed, so every variant has exactly
    /// one signer behavior.
    pub fn create_signer(&self, pair: &KeyPair) -> Box<dyn TransactionSigner> {
        match pair {
            KeyPair::Rsa { private, .. } => Box::new(RsaSigner {
                key: pkcs1v15::SigningKey::<Sha256>::new(private.clone()),
            }),
            KeyPair::Ecc { private, .. } => Box::new(EccSigner {
                key: p256::ecdsa::SigningKey::from(private),
            }),
        }
    }
}

struct RsaSigner {
    key: pkcs1v15::SigningKey<Sha256>,
}

impl TransactionSigner for RsaSigner {
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, SignError> {
        let signature = self.key.try_sign(data).map_err(|e| SignError::Primitive {
            reason: e.to_string(),
        })?;
        Ok(signature.to_vec())
    }
}

struct EccSigner {
    key: p256::ecdsa::SigningKey,
}

impl TransactionSigner for EccSigner {
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, SignError> {
        let signature: p256::ecdsa::Signature =
            self.key.try_sign(data).map_err(|e| SignError::Primitive {
                reason: e.to_string(),
            })?;
        Ok(signature.to_der().to_vec())
    }
}
