//! Cosigner registry
//!
//! Holds the local signer and the remote cosigners in insertion order.
//! Fingerprints are unique across the whole registry, including the local
//! signer. Once a wallet is created the registry is frozen and rejects
//! mutation until it is reset.

use super::fingerprint::Fingerprint;
use super::signer::Signer;
use crate::multisig::WalletError;

#[derive(Clone, Debug)]
pub struct CosignerRegistry {
    us: Signer,
    cosigners: Vec<Signer>,
    frozen: bool,
}

impl CosignerRegistry {
    /// Create an empty registry around the local signer
    pub fn new(us: Signer) -> Self {
        Self {
            us,
            cosigners: Vec::new(),
            frozen: false,
        }
    }

    /// The local signer
    pub fn us(&self) -> &Signer {
        &self.us
    }

    /// Check if a fingerprint belongs to the local signer or a cosigner
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.us.fingerprint == *fingerprint
            || self.cosigners.iter().any(|c| c.fingerprint == *fingerprint)
    }

    /// Append a cosigner
    pub fn add_cosigner(&mut self, signer: Signer) -> Result<(), WalletError> {
        if self.frozen {
            return Err(WalletError::WalletAlreadyActive);
        }
        if self.contains(&signer.fingerprint) {
            return Err(WalletError::DuplicateFingerprint(signer.fingerprint));
        }
        self.cosigners.push(signer);
        Ok(())
    }

    /// Remove every cosigner; succeeds on an empty list
    pub fn remove_all_cosigners(&mut self) -> Result<(), WalletError> {
        if self.frozen {
            return Err(WalletError::WalletAlreadyActive);
        }
        self.cosigners.clear();
        Ok(())
    }

    pub fn cosigners(&self) -> &[Signer] {
        &self.cosigners
    }

    pub fn cosigner_count(&self) -> usize {
        self.cosigners.len()
    }

    pub fn has_cosigners(&self) -> bool {
        !self.cosigners.is_empty()
    }

    /// Local signer followed by cosigners in insertion order
    pub fn all_signers(&self) -> Vec<Signer> {
        std::iter::once(self.us.clone())
            .chain(self.cosigners.iter().cloned())
            .collect()
    }

    pub(crate) fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Unfreeze and drop every cosigner
    pub(crate) fn reset(&mut self) {
        self.frozen = false;
        self.cosigners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(byte: u8) -> Fingerprint {
        Fingerprint::from([byte; 4])
    }

    fn registry() -> CosignerRegistry {
        CosignerRegistry::new(Signer::new(fp(0xAA), ""))
    }

    #[test]
    fn test_rejects_local_fingerprint() {
        let mut reg = registry();
        let err = reg.add_cosigner(Signer::new(fp(0xAA), "clone")).unwrap_err();

        assert!(matches!(err, WalletError::DuplicateFingerprint(f) if f == fp(0xAA)));
        assert!(!reg.has_cosigners());
    }

    #[test]
    fn test_rejects_duplicate_cosigner() {
        let mut reg = registry();
        reg.add_cosigner(Signer::new(fp(0x11), "A")).unwrap();

        assert!(matches!(
            reg.add_cosigner(Signer::new(fp(0x11), "A again")),
            Err(WalletError::DuplicateFingerprint(_))
        ));
        assert_eq!(reg.cosigner_count(), 1);
        assert_eq!(reg.cosigners()[0].name, "A");
    }

    #[test]
    fn test_insertion_order() {
        let mut reg = registry();
        reg.add_cosigner(Signer::new(fp(0x22), "B")).unwrap();
        reg.add_cosigner(Signer::new(fp(0x11), "A")).unwrap();

        let names: Vec<&str> = reg.cosigners().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);

        let all = reg.all_signers();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].fingerprint, fp(0xAA));
    }

    #[test]
    fn test_remove_all_is_idempotent() {
        let mut reg = registry();
        reg.remove_all_cosigners().unwrap();

        reg.add_cosigner(Signer::new(fp(0x11), "")).unwrap();
        reg.remove_all_cosigners().unwrap();
        reg.remove_all_cosigners().unwrap();
        assert!(!reg.has_cosigners());
    }

    #[test]
    fn test_frozen_rejects_mutation() {
        let mut reg = registry();
        reg.add_cosigner(Signer::new(fp(0x11), "")).unwrap();
        reg.freeze();

        assert!(matches!(
            reg.add_cosigner(Signer::new(fp(0x22), "")),
            Err(WalletError::WalletAlreadyActive)
        ));
        assert!(matches!(
            reg.remove_all_cosigners(),
            Err(WalletError::WalletAlreadyActive)
        ));
        assert_eq!(reg.cosigner_count(), 1);

        reg.reset();
        assert!(!reg.has_cosigners());
        reg.add_cosigner(Signer::new(fp(0x22), "")).unwrap();
    }
}
