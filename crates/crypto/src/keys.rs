//! Key pair generation for the closed set of device algorithms.

use std::fmt;
use std::str::FromStr;

use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default RSA modulus size in bits.
pub const DEFAULT_RSA_BITS: usize = 2048;

/// Signature algorithm supported by signing devices.
///
/// The set is closed: adding an algorithm means adding a variant here and
/// extending the `match` arms in generation, codec and signer creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "RSA")]
    Rsa,
    #[serde(rename = "ECC")]
    Ecc,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Rsa => write!(f, "RSA"),
            Algorithm::Ecc => write!(f, "ECC"),
        }
    }
}

/// Error returned when an algorithm tag from the outside world is not in
/// the supported set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported algorithm: {tag}")]
pub struct AlgorithmParseError {
    pub tag: String,
}

impl FromStr for Algorithm {
    type Err = AlgorithmParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RSA" => Ok(Algorithm::Rsa),
            "ECC" => Ok(Algorithm::Ecc),
            other => Err(AlgorithmParseError {
                tag: other.to_string(),
            }),
        }
    }
}

/// A device's key pair, tagged by algorithm.
///
/// The private component is the authoritative part; the public component is
/// kept alongside so signers and fingerprints never have to re-derive it.
#[derive(Clone)]
pub enum KeyPair {
    Rsa {
        public: RsaPublicKey,
        private: RsaPrivateKey,
    },
    Ecc {
        public: p256::PublicKey,
        private: p256::SecretKey,
    },
}

impl KeyPair {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            KeyPair::Rsa { .. } => Algorithm::Rsa,
            KeyPair::Ecc { .. } => Algorithm::Ecc,
        }
    }
}

// Private material must never end up in log output.
impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("algorithm", &self.algorithm())
            .finish_non_exhaustive()
    }
}

/// Errors that can occur while generating a key pair.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("RSA key generation failed: {0}")]
    Rsa(#[from] rsa::Error),
}

/// Produces fresh key pairs from the process random source.
#[derive(Debug, Clone)]
pub struct KeyPairGenerator {
    rsa_bits: usize,
}

impl KeyPairGenerator {
    pub fn new() -> Self {
        Self {
            rsa_bits: DEFAULT_RSA_BITS,
        }
    }

    /// Override the RSA modulus size, e.g. from service configuration.
    pub fn with_rsa_bits(rsa_bits: usize) -> Self {
        Self { rsa_bits }
    }

    /// Generate a fresh key pair for `algorithm`.
    pub fn generate(&self, algorithm: Algorithm) -> Result<KeyPair, GenerationError> {
        match algorithm {
            Algorithm::Rsa => {
                let mut rng = rand::thread_rng();
                let private = RsaPrivateKey::new(&mut rng, self.rsa_bits)?;
                let public = RsaPublicKey::from(&private);
                Ok(KeyPair::Rsa { public, private })
            }
            Algorithm::Ecc => {
                let private = p256::SecretKey::random(&mut rand::thread_rng());
                let public = private.public_key();
                Ok(KeyPair::Ecc { public, private })
            }
        }
    }
}

impl Default for KeyPairGenerator {
    fn default() -> Self {
        Self::new()
    }
}
