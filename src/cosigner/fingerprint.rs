//! BIP-32 key fingerprints

use secp256k1::PublicKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::crypto::key_fingerprint;

/// Length of a fingerprint in bytes
pub const FINGERPRINT_LEN: usize = 4;

/// Errors parsing a fingerprint from text
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseFingerprintError {
    #[error("Invalid hex: {0}")]
    InvalidHex(String),
    #[error("Expected 4 bytes, got {0}")]
    InvalidLength(usize),
}

/// Identifier of a signing key, compared byte for byte
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    /// Fingerprint of a public key
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        Self(key_fingerprint(public_key))
    }

    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }

    /// Lowercase hex rendering
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; FINGERPRINT_LEN]> for Fingerprint {
    fn from(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Fingerprint {
    type Err = ParseFingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| ParseFingerprintError::InvalidHex(e.to_string()))?;
        let array: [u8; FINGERPRINT_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ParseFingerprintError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
