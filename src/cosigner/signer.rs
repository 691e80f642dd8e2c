//! Signers and the local signing key

use bip39::Mnemonic;
use serde::{Deserialize, Serialize};

use super::fingerprint::Fingerprint;
use crate::crypto::{generate_mnemonic, master_key_pair, parse_mnemonic, KeyError, KeyPair};

/// A participant in the multisig wallet
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Signer {
    pub fingerprint: Fingerprint,
    /// Display name, empty when unnamed
    #[serde(default)]
    pub name: String,
    /// Compressed public key (hex) when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

impl Signer {
    /// Create a signer known only by fingerprint
    pub fn new(fingerprint: Fingerprint, name: &str) -> Self {
        Self {
            fingerprint,
            name: name.to_string(),
            public_key: None,
        }
    }

    /// Create a signer carrying its public key
    pub fn with_public_key(fingerprint: Fingerprint, name: &str, public_key: String) -> Self {
        Self {
            fingerprint,
            name: name.to_string(),
            public_key: Some(public_key),
        }
    }

    pub fn fingerprint_hex(&self) -> String {
        self.fingerprint.to_hex()
    }

    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }

    /// `"<hex> (<name>)"`, or just the hex when unnamed
    pub fn display_label(&self) -> String {
        if self.is_named() {
            format!("{} ({})", self.fingerprint_hex(), self.name)
        } else {
            self.fingerprint_hex()
        }
    }
}

/// The key material behind the local signer ("us")
///
/// Backed by a BIP-39 mnemonic; the signer identity is the fingerprint of
/// the BIP-32 master public key derived from it.
#[derive(Clone)]
pub struct LocalKey {
    mnemonic: Mnemonic,
    key_pair: KeyPair,
    name: String,
}

impl LocalKey {
    /// Generate a fresh local key
    pub fn generate(name: &str) -> Result<Self, KeyError> {
        Self::from_mnemonic(generate_mnemonic()?, name)
    }

    /// Restore a local key from its recovery phrase
    pub fn from_phrase(words: &str, name: &str) -> Result<Self, KeyError> {
        Self::from_mnemonic(parse_mnemonic(words)?, name)
    }

    fn from_mnemonic(mnemonic: Mnemonic, name: &str) -> Result<Self, KeyError> {
        let key_pair = master_key_pair(&mnemonic)?;
        Ok(Self {
            mnemonic,
            key_pair,
            name: name.to_string(),
        })
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::from(self.key_pair.fingerprint())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn public_key_hex(&self) -> String {
        self.key_pair.public_key_hex()
    }

    /// The recovery phrase. Callers gate disclosure.
    pub fn phrase(&self) -> String {
        self.mnemonic.to_string()
    }

    /// Public signer view of this key
    pub fn signer(&self) -> Signer {
        Signer::with_public_key(self.fingerprint(), &self.name, self.public_key_hex())
    }
}

impl std::fmt::Debug for LocalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalKey")
            .field("fingerprint", &self.fingerprint())
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label() {
        let fp = Fingerprint::from([0x11, 0x11, 0x11, 0x11]);
        assert_eq!(Signer::new(fp, "").display_label(), "11111111");
        assert_eq!(Signer::new(fp, "Alice").display_label(), "11111111 (Alice)");
    }

    #[test]
    fn test_local_key_restore() {
        let key = LocalKey::generate("me").unwrap();
        let restored = LocalKey::from_phrase(&key.phrase(), "me").unwrap();

        assert_eq!(key.fingerprint(), restored.fingerprint());
        assert_eq!(key.signer(), restored.signer());
        assert_eq!(key.phrase().split_whitespace().count(), 24);
    }

    #[test]
    fn test_debug_hides_phrase() {
        let key = LocalKey::generate("").unwrap();
        let debug = format!("{:?}", key);
        assert!(debug.contains(&key.fingerprint().to_hex()));
        assert!(!debug.contains(&key.phrase()));
    }
}
