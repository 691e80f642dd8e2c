//! secp256k1 key management for signers
//!
//! Provides key pair construction, public key parsing, and the BIP-32
//! fingerprint of a public key.

use secp256k1::{PublicKey, Secp256k1, SecretKey};
use thiserror::Error;

use super::hash::hash160;

/// Errors that can occur during key operations
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Invalid public key")]
    InvalidPublicKey,
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),
    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),
}

/// A key pair consisting of a private key and its corresponding public key
#[derive(Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Create a key pair from an existing secret key
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from raw 32-byte secret material
    pub fn from_secret_bytes(bytes: &[u8; 32]) -> Result<Self, KeyError> {
        let secret_key = SecretKey::from_slice(bytes).map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Get the public key as a hex string (compressed format)
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize())
    }

    /// BIP-32 fingerprint of the public key
    pub fn fingerprint(&self) -> [u8; 4] {
        key_fingerprint(&self.public_key)
    }
}

/// First four bytes of hash160 over the compressed public key
pub fn key_fingerprint(public_key: &PublicKey) -> [u8; 4] {
    let hash = hash160(&public_key.serialize());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Parse a public key from hex string
pub fn public_key_from_hex(hex_key: &str) -> Result<PublicKey, KeyError> {
    let bytes = hex::decode(hex_key).map_err(|_| KeyError::InvalidPublicKey)?;
    PublicKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPublicKey)
}
