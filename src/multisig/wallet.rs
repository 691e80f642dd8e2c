//! Threshold wallet
//!
//! A wallet freezes the signer set and threshold chosen at creation time.

use crate::cosigner::{Fingerprint, Signer};
use crate::crypto::{sha256, KeyError};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors related to cosigner and wallet operations
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Duplicate fingerprint: {0}")]
    DuplicateFingerprint(Fingerprint),
    #[error("A wallet already exists; cosigners are frozen")]
    WalletAlreadyActive,
    #[error("Invalid threshold {threshold} with {cosigners} cosigner(s)")]
    InvalidThreshold { threshold: usize, cosigners: usize },
    #[error("No active wallet")]
    NoActiveWallet,
    #[error("Could not parse cosigner import: {0}")]
    ImportParseError(String),
    #[error("Crypto error: {0}")]
    CryptoError(#[from] KeyError),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// A created M-of-N wallet
#[derive(Clone)]
pub struct Wallet {
    threshold: usize,
    signers: Vec<Signer>,
    mnemonic: String,
    created_at: DateTime<Utc>,
}

impl Wallet {
    pub(crate) fn new(
        threshold: usize,
        signers: Vec<Signer>,
        mnemonic: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            threshold,
            signers,
            mnemonic,
            created_at,
        }
    }

    /// Get the required threshold (M)
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Local signer first, then cosigners in insertion order
    pub fn signers(&self) -> &[Signer] {
        &self.signers
    }

    /// Get the total number of signers (N)
    pub fn signer_count(&self) -> usize {
        self.signers.len()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    /// Get description like "2-of-3"
    pub fn description(&self) -> String {
        format!("{}-of-{}", self.threshold, self.signers.len())
    }

    /// Deterministic identifier over threshold and sorted fingerprints
    ///
    /// id = hex(SHA256(threshold_be64 || sorted fingerprints)[..8])
    pub fn id(&self) -> String {
        let mut fingerprints: Vec<Fingerprint> =
            self.signers.iter().map(|s| s.fingerprint).collect();
        fingerprints.sort();

        let mut data = (self.threshold as u64).to_be_bytes().to_vec();
        for fp in &fingerprints {
            data.extend_from_slice(fp.as_bytes());
        }
        hex::encode(&sha256(&data)[..8])
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("threshold", &self.threshold)
            .field("signers", &self.signers)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signers(bytes: &[u8]) -> Vec<Signer> {
        bytes
            .iter()
            .map(|b| Signer::new(Fingerprint::from([*b; 4]), ""))
            .collect()
    }

    #[test]
    fn test_description() {
        let wallet = Wallet::new(2, signers(&[1, 2, 3]), "words".into(), Utc::now());
        assert_eq!(wallet.description(), "2-of-3");
        assert_eq!(wallet.signer_count(), 3);
        assert_eq!(wallet.signers()[1].fingerprint, Fingerprint::from([2; 4]));
    }

    #[test]
    fn test_id_ignores_signer_order() {
        let a = Wallet::new(2, signers(&[1, 2, 3]), "x".into(), Utc::now());
        let b = Wallet::new(2, signers(&[3, 1, 2]), "y".into(), Utc::now());
        let c = Wallet::new(3, signers(&[1, 2, 3]), "x".into(), Utc::now());

        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
        assert_eq!(a.id().len(), 16);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_id_distinguishes_wide_thresholds() {
        let wide = u32::MAX as usize + 3;
        let a = Wallet::new(2, signers(&[1, 2]), "x".into(), Utc::now());
        let b = Wallet::new(wide, signers(&[1, 2]), "x".into(), Utc::now());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_debug_hides_mnemonic() {
        let wallet = Wallet::new(2, signers(&[1, 2]), "secret words".into(), Utc::now());
        assert!(!format!("{:?}", wallet).contains("secret words"));
    }
}
